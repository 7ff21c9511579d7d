#![forbid(unsafe_code)]
//! Wire contract for the praxis HTTP API: request/response DTOs, the error
//! envelope, and request-payload validation. Everything here is pure; the
//! server crate owns transport concerns.

mod convert;
mod dto;
mod error_mapping;
mod errors;
mod params;

pub use convert::{customization_to_dto, process_to_dto};
pub use dto::{
    AccessTokenResponse, BulkKanbanRequest, BulkKanbanResponse, ClassificationDto,
    CustomizationDto, CustomizationUpsertRequest, DepartmentWriteRequest, KanbanUpdateRequest,
    ProcessDto, ProcessWriteRequest, RegisterRequest, TaskCreateRequest, TaskPatchRequest,
    TokenPairResponse, TokenRefreshRequest, TokenRequest, TwoFaLoginRequest, TwoFaSetupRequest,
};
pub use error_mapping::{map_error, ApiErrorMapping};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_bulk_request, parse_department_write, parse_kanban_update, parse_process_create,
    parse_process_patch, parse_register, parse_scope_query, parse_upsert_request,
};
