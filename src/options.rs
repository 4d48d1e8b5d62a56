use serde::Deserialize;

/// Options for `receive_body`.
///
/// Nothing is limited by default. Size and count policies belong to whoever deploys the
/// endpoint, these are the hooks for them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultipartOptions {
    /// The maximum size of each file part and text field, in bytes.
    pub max_file_size: Option<usize>,
    /// The maximum number of file parts.
    pub max_num_files: Option<usize>,
}

impl MultipartOptions {
    /// Set maximum file size.
    pub fn max_file_size(self, size: usize) -> Self {
        MultipartOptions {
            max_file_size: Some(size),
            ..self
        }
    }

    /// Set maximum number of files.
    pub fn max_num_files(self, n: usize) -> Self {
        MultipartOptions {
            max_num_files: Some(n),
            ..self
        }
    }
}
