use std::collections::HashMap;

use crate::{
    FileHandle, MapError, ParseRequestError, Result, UploadMap, UploadRequest, Value, VariablePath,
};

impl UploadRequest {
    /// Put `upload` where `path` points.
    ///
    /// The slot must exist and hold a `null` placeholder. A slot filled by an earlier upload of
    /// the same request is overwritten.
    pub fn set_upload(&mut self, path: &VariablePath, upload: FileHandle) -> Result<()> {
        let slot = self.variables.resolve_mut(path)?;
        match *slot {
            Value::Null | Value::Upload(_) => {
                *slot = Value::Upload(upload);
                Ok(())
            }
            _ => Err(MapError::NotPlaceholder(path.to_string()).into()),
        }
    }

    /// Replace every placeholder `map` points to with its file.
    ///
    /// Fields are handled in map order and each path gets its own clone of the handle. On failure
    /// the request is dropped.
    pub fn inject_uploads(
        mut self,
        map: &UploadMap,
        files: &HashMap<String, FileHandle>,
    ) -> Result<Self> {
        map.check_files(files)?;
        for (field_name, paths) in map.iter() {
            let upload = files
                .get(field_name)
                .ok_or_else(|| ParseRequestError::MissingFile(vec![field_name.to_string()]))?;
            for path in paths {
                self.set_upload(path, upload.clone())?;
            }
        }
        Ok(self)
    }
}
