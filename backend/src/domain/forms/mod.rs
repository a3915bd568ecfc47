//! Printable PDF forms.
//!
//! A record is poured into an XFDF field document, the external renderer
//! fills the store's base PDF with it, and the result is kept just long
//! enough to be downloaded.

mod name;
mod service;
mod template;

pub use name::{FormName, FormNameError};
pub use service::{FORM_RETENTION, FormService, form_values};
pub use template::{FormTemplate, FormTemplateError};
