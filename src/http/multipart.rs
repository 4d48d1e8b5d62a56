use std::collections::HashMap;
use std::error::Error as StdError;

use bytes::Bytes;
use futures_util::stream::Stream;
use multer::{Constraints, Multipart, SizeLimit};

use crate::{BodyError, FileHandle, MultipartOptions, Result, UploadMap, UploadRequest};

/// The three logical parts of an upload body.
struct MultipartParts {
    operations: String,
    map: String,
    files: HashMap<String, FileHandle>,
}

pub(super) async fn receive_multipart<S, O, E>(
    body: S,
    boundary: String,
    opts: MultipartOptions,
) -> Result<UploadRequest>
where
    S: Stream<Item = std::result::Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn StdError + Send + Sync>> + 'static,
{
    let MultipartParts {
        operations,
        map,
        files,
    } = decode(body, boundary, opts).await?;

    let request = UploadRequest::from_operations(&operations)?;
    let map = UploadMap::parse(&map, &files)?;
    let request = request.inject_uploads(&map, &files)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        files = map.len(),
        paths = map.iter().map(|(_, paths)| paths.len()).sum::<usize>(),
        unreferenced = files.keys().filter(|name| !map.contains(name)).count(),
        "assembled GraphQL upload request"
    );

    Ok(request)
}

async fn decode<S, O, E>(body: S, boundary: String, opts: MultipartOptions) -> Result<MultipartParts>
where
    S: Stream<Item = std::result::Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn StdError + Send + Sync>> + 'static,
{
    let mut constraints = Constraints::new();
    if let Some(max_file_size) = opts.max_file_size {
        constraints = constraints.size_limit(SizeLimit::new().per_field(max_file_size as u64));
    }
    let mut multipart = Multipart::with_constraints(body, boundary, constraints);

    let mut operations = None;
    let mut map = None;
    let mut files = HashMap::new();

    while let Some(mut field) = multipart.next_field().await? {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match name.as_str() {
            "operations" => {
                if operations.replace(field.text().await?).is_some() {
                    return Err(BodyError::DuplicateField(name).into());
                }
            }
            "map" => {
                if map.replace(field.text().await?).is_some() {
                    return Err(BodyError::DuplicateField(name).into());
                }
            }
            _ => {
                // Parts without a filename are not files, skip them unread.
                let filename = match field.file_name() {
                    Some(filename) => filename.to_string(),
                    None => continue,
                };
                // A repeated file field replaces the earlier part.
                if let Some(max_num_files) = opts.max_num_files {
                    if !files.contains_key(&name) && files.len() >= max_num_files {
                        return Err(BodyError::TooManyFiles(max_num_files).into());
                    }
                }

                let content_type = field.content_type().map(ToString::to_string);
                let mut spool = FileHandle::spool(name.clone(), filename, content_type)
                    .map_err(BodyError::Io)?;
                while let Some(chunk) = field.chunk().await? {
                    spool.write_chunk(&chunk).map_err(BodyError::Io)?;
                }
                let file = spool.finish().map_err(BodyError::Io)?;

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    field = %file.field_name(),
                    filename = %file.filename(),
                    size = file.size().unwrap_or_default(),
                    "spooled file part"
                );

                files.insert(name, file);
            }
        }
    }

    Ok(MultipartParts {
        operations: operations.ok_or(BodyError::MissingOperations)?,
        map: map.ok_or(BodyError::MissingMap)?,
        files,
    })
}
