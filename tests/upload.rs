use std::io::{self, Read};

use bytes::Bytes;
use futures_util::io::AsyncReadExt;
use futures_util::stream;
use graphql_upload::http::receive_body;
use graphql_upload::*;
use serde_json::json;

const BOUNDARY: &str = "----Boundary";
const CONTENT_TYPE: &str = "multipart/form-data; boundary=----Boundary";

fn text(name: &str, value: &str) -> String {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
    )
}

fn file(name: &str, filename: &str, content: &str) -> String {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n{}\r\n",
        BOUNDARY, name, filename, content
    )
}

fn form(parts: &[String]) -> String {
    format!("{}--{}--\r\n", parts.concat(), BOUNDARY)
}

async fn receive(content_type: &str, body: String) -> Result<UploadRequest> {
    let body = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(body))]);
    receive_body(Some(content_type), body, MultipartOptions::default()).await
}

fn content(upload: &FileHandle) -> String {
    let mut s = String::new();
    upload
        .clone()
        .into_read()
        .unwrap()
        .read_to_string(&mut s)
        .unwrap();
    s
}

#[async_std::test]
pub async fn test_single_file() {
    let operations = json!({
        "query": "mutation($textFile: Upload!){readText(textFile:$textFile)}",
        "variables": { "textFile": null },
    });
    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations.to_string()),
            text("map", r#"{"textFile":["variables.textFile"]}"#),
            file("textFile", "textFile.txt", "strawberry"),
        ]),
    )
    .await
    .unwrap();

    assert_eq!(
        request.query,
        "mutation($textFile: Upload!){readText(textFile:$textFile)}"
    );
    let upload = request.variables["textFile"].as_upload().unwrap();
    assert_eq!(upload.field_name(), "textFile");
    assert_eq!(upload.filename(), "textFile.txt");
    assert_eq!(upload.content_type(), Some("text/plain"));
    assert_eq!(content(upload), "strawberry");
}

#[async_std::test]
pub async fn test_round_trip_keeps_other_values() {
    let variables = json!({
        "input": {
            "title": "hello",
            "count": 3,
            "ratio": 0.5,
            "flags": [true, false],
            "attachments": [null, { "file": null, "note": "x" }],
            "empty": null,
        },
        "avatar": null,
    });
    let operations = json!({ "query": "mutation { a }", "variables": variables });
    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations.to_string()),
            text(
                "map",
                r#"{"0":["variables.input.attachments.0"],"1":["variables.input.attachments.1.file"],"2":["variables.avatar"]}"#,
            ),
            file("0", "a.txt", "a"),
            file("1", "b.txt", "b"),
            file("2", "c.txt", "c"),
        ]),
    )
    .await
    .unwrap();

    let variables_after = serde_json::to_value(&request.variables).unwrap();
    assert_eq!(variables_after, variables);

    let value = request.variables.into_value();
    let uploads = value
        .uploads()
        .into_iter()
        .map(content)
        .collect::<Vec<_>>();
    assert_eq!(uploads, vec!["a", "b", "c"]);
    assert!(value
        .get("input")
        .and_then(|input| input.get("empty"))
        .unwrap()
        .is_null());
}

#[async_std::test]
pub async fn test_nested_list() {
    let operations = json!({
        "query": "mutation($folder: FolderInput!) { readFolder(folder: $folder) }",
        "variables": { "folder": { "files": [null, null] } },
    });
    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations.to_string()),
            text(
                "map",
                r#"{"file1":["variables.folder.files.0"],"file2":["variables.folder.files.1"]}"#,
            ),
            file("file1", "file1.txt", "strawberry1"),
            file("file2", "file2.txt", "strawberry2"),
        ]),
    )
    .await
    .unwrap();

    match request.variables["folder"].get("files") {
        Some(Value::List(files)) => {
            assert_eq!(files.len(), 2);
            assert_eq!(content(files[0].as_upload().unwrap()), "strawberry1");
            assert_eq!(content(files[1].as_upload().unwrap()), "strawberry2");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[async_std::test]
pub async fn test_async_read() {
    let operations = json!({ "query": "mutation { a }", "variables": { "f": null } });
    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations.to_string()),
            text("map", r#"{"f":["variables.f"]}"#),
            file("f", "f.txt", "strawberry"),
        ]),
    )
    .await
    .unwrap();

    let upload = request.variables["f"].as_upload().unwrap().clone();
    let mut reader = upload.into_async_read().unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).await.unwrap();
    assert_eq!(content, "strawberry");
}

#[async_std::test]
pub async fn test_repeated_file_field() {
    let operations = json!({ "query": "mutation { a }", "variables": { "f": null } }).to_string();
    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", r#"{"f":["variables.f"]}"#),
            file("f", "f.txt", "strawberry"),
            file("extra", "extra1.txt", "one"),
            file("extra", "extra2.txt", "two"),
        ]),
    )
    .await
    .unwrap();
    assert_eq!(content(request.variables["f"].as_upload().unwrap()), "strawberry");

    let request = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", r#"{"f":["variables.f"]}"#),
            file("f", "first.txt", "first"),
            file("f", "second.txt", "second"),
        ]),
    )
    .await
    .unwrap();
    let upload = request.variables["f"].as_upload().unwrap();
    assert_eq!(upload.filename(), "second.txt");
    assert_eq!(content(upload), "second");

    let stream = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(form(&[
        text("operations", &operations),
        text("map", r#"{"f":["variables.f"]}"#),
        file("f", "first.txt", "first"),
        file("f", "second.txt", "second"),
    ])))]);
    let request = receive_body(
        Some(CONTENT_TYPE),
        stream,
        MultipartOptions::default().max_num_files(1),
    )
    .await
    .unwrap();
    assert_eq!(content(request.variables["f"].as_upload().unwrap()), "second");
}

#[async_std::test]
pub async fn test_missing_file_with_bad_path() {
    let operations = json!({ "query": "mutation { a }", "variables": { "f": null } }).to_string();
    let err = receive(
        CONTENT_TYPE,
        form(&[text("operations", &operations), text("map", r#"{"f":["file"]}"#)]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.response_body(), "400: File(s) missing in form data");
}

#[async_std::test]
pub async fn test_errors() {
    let operations = json!({ "query": "mutation { a }", "variables": { "f": null } }).to_string();

    let err = receive(
        CONTENT_TYPE,
        form(&[text("map", r#"{"f":["variables.f"]}"#), file("f", "f.txt", "x")]),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::MalformedBody(BodyError::MissingOperations)
    ));

    let err = receive(
        CONTENT_TYPE,
        form(&[text("operations", &operations), file("f", "f.txt", "x")]),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::MalformedBody(BodyError::MissingMap)
    ));

    let err = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("operations", &operations),
            text("map", r#"{"f":["variables.f"]}"#),
        ]),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::MalformedBody(BodyError::DuplicateField(_))
    ));

    let err = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", r#"{"f":"variables.f"}"#),
            file("f", "f.txt", "x"),
        ]),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::InvalidMap(MapError::InvalidShape)
    ));

    let err = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", r#"{"f":["variables.g"]}"#),
            file("f", "f.txt", "x"),
        ]),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.response_body(),
        "400: Invalid path 'variables.g' found inside 'map' field, it does not point to a valid value inside 'operations' field."
    );

    let err = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", r#"{"f":["variables.f"],"g":["variables.f"]}"#),
            file("f", "f.txt", "x"),
        ]),
    )
    .await
    .unwrap_err();
    match err {
        ParseRequestError::MissingFile(missing) => assert_eq!(missing, vec!["g"]),
        other => panic!("unexpected {:?}", other),
    }

    let err = receive(
        CONTENT_TYPE,
        form(&[
            text("operations", &operations),
            text("map", "{"),
            file("f", "f.txt", "x"),
        ]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ParseRequestError::InvalidJson(_)));
    assert_eq!(err.response_body(), "400: Unable to parse the multipart body");
}

#[async_std::test]
pub async fn test_client_disconnect() {
    let head = text(
        "operations",
        &json!({ "query": "mutation { a }", "variables": { "f": null } }).to_string(),
    );
    let body = stream::iter(vec![
        Ok(Bytes::from(head)),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
    ]);
    let err = receive_body(Some(CONTENT_TYPE), body, MultipartOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ParseRequestError::MalformedBody(_)));
    assert_eq!(err.response_body(), "400: Unable to parse the multipart body");
}

#[async_std::test]
pub async fn test_limits() {
    let operations =
        json!({ "query": "mutation { a }", "variables": { "a": null, "b": null } }).to_string();
    let body = || {
        form(&[
            text("operations", &operations),
            text("map", r#"{"a":["variables.a"],"b":["variables.b"]}"#),
            file("a", "a.txt", "strawberry"),
            file("b", "b.txt", "strawberry"),
        ])
    };

    let stream = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(body()))]);
    let err = receive_body(
        Some(CONTENT_TYPE),
        stream,
        MultipartOptions::default().max_num_files(1),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::MalformedBody(BodyError::TooManyFiles(1))
    ));

    let stream = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(body()))]);
    let err = receive_body(
        Some(CONTENT_TYPE),
        stream,
        MultipartOptions::default().max_file_size(200).max_num_files(2),
    )
    .await;
    assert!(err.is_ok());

    let stream = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(body()))]);
    let err = receive_body(
        Some(CONTENT_TYPE),
        stream,
        MultipartOptions::default().max_file_size(5),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ParseRequestError::MalformedBody(BodyError::Multipart(_))
    ));
}

#[async_std::test]
pub async fn test_json_body() {
    let request = receive(
        "application/json",
        json!({ "query": "{ a }", "operationName": "A" }).to_string(),
    )
    .await
    .unwrap();
    assert_eq!(request.query, "{ a }");
    assert_eq!(request.operation_name.as_deref(), Some("A"));
    assert!(request.variables.is_empty());

    let err = receive("application/json", "}".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ParseRequestError::InvalidJson(_)));
}
