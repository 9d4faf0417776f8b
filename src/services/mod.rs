//! Services module
//! 
//! Upload handling shared by the document and driver endpoints: multipart
//! collection and the validated file store.

pub mod file_storage;
pub mod multipart_form;

pub use file_storage::{FileStorage, StoredFile, UploadPolicy, UploadedFile};
pub use multipart_form::MultipartForm;
