#![forbid(unsafe_code)]
//! Praxis domain model SSOT.
//!
//! Pure types and policy only: no I/O, no async. Everything the store and
//! the HTTP surface agree on lives here.

mod account;
mod customization;
mod department;
mod process;
mod resolve;
mod task;

pub use account::Account;
pub use customization::{CountryCode, Customization, ProcessRef, Scope};
pub use department::Department;
pub use process::{
    parse_item_list, Classification, ClassificationKind, ItemRef, KanbanState, Process,
    ValidationError, Variant, ITEM_NAME_MAX_LEN, PROCESS_NAME_MAX_LEN,
};
pub use resolve::{match_customization, resolve_effective, EffectiveItto};
pub use task::Task;

pub const CRATE_NAME: &str = "praxis-model";

#[cfg(test)]
mod resolve_tests;
