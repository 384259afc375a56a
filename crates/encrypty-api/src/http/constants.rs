//! Shared HTTP constants (headers, multipart fields, caller-facing messages).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const FIELD_FILES: &str = "files";
pub(crate) const FIELD_ACTION: &str = "action";

pub(crate) const MSG_NO_FILES: &str = "No files provided";
pub(crate) const MSG_NO_SELECTION: &str = "No files selected";
pub(crate) const MSG_NO_VALID_FILES: &str = "No valid files uploaded";
pub(crate) const MSG_INVALID_ACTION: &str = "Invalid action; expected 'encrypt' or 'decrypt'";
pub(crate) const MSG_NO_DIRECTORY: &str = "Directory path not provided";
pub(crate) const MSG_INVALID_DIRECTORY: &str = "Invalid directory path";
pub(crate) const MSG_INVALID_JSON: &str = "Invalid JSON body";
pub(crate) const MSG_ENGINE_MISSING: &str =
    "Engine executable not found. Please build the engine first.";
pub(crate) const MSG_TIMED_OUT: &str = "Operation timed out";
pub(crate) const MSG_FILE_NOT_FOUND: &str = "File not found";
pub(crate) const MSG_INVALID_FILENAME: &str = "Invalid filename";
pub(crate) const MSG_ROUTE_NOT_FOUND: &str = "Not found";
