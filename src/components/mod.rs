//! UI Components
//!
//! Screens and the shared widgets they are built from.

mod activity_log;
mod auth_page;
mod delete_confirm_button;
mod error_banner;
mod expense_page;
mod nav_bar;
mod template_page;

pub use activity_log::ActivityLog;
pub use auth_page::AuthPage;
pub use delete_confirm_button::DeleteConfirmButton;
pub use error_banner::ErrorBanner;
pub use expense_page::ExpensePage;
pub use nav_bar::NavBar;
pub use template_page::TemplatePage;
