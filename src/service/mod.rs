//! Service module
//!
//! Business rules for bank accounts. Every operation is a stateless
//! transformation over the store's current contents.

mod account_service;
mod error;
pub mod main_account;
mod result;


pub use account_service::AccountService;
pub use error::{ServiceError, ServiceResult};
pub use main_account::select_main_account;
pub use result::OperationResult;
