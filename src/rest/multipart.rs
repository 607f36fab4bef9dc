use std::collections::BTreeMap;

use uuid::Uuid;

/// Encodes a `multipart/form-data` body.
///
/// Each file becomes a part named `file_key` with a generated file name,
/// followed by every value of `multi_params` and then `params`. Returns the
/// body and the matching `Content-Type` header value.
pub fn multipart_form(
    file_key: &str,
    files: &[Vec<u8>],
    params: &BTreeMap<String, String>,
    multi_params: &BTreeMap<String, Vec<String>>,
) -> (Vec<u8>, String) {
    let boundary = Uuid::new_v4().simple().to_string();
    let mut writer = PartWriter::new(&boundary);

    for file in files {
        let file_name = Uuid::new_v4().simple().to_string();
        writer.part(
            &format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream",
                escape_quotes(file_key),
                file_name
            ),
            file,
        );
    }

    for (key, values) in multi_params {
        for value in values {
            writer.field(key, value);
        }
    }

    for (key, value) in params {
        writer.field(key, value);
    }

    let body = writer.finish();
    (body, format!("multipart/form-data; boundary={}", boundary))
}

struct PartWriter<'a> {
    boundary: &'a str,
    body: Vec<u8>,
}

impl<'a> PartWriter<'a> {
    fn new(boundary: &'a str) -> Self {
        Self { boundary, body: Vec::new() }
    }

    fn part(&mut self, headers: &str, content: &[u8]) {
        if !self.body.is_empty() {
            self.body.extend_from_slice(b"\r\n");
        }
        self.body.extend_from_slice(format!("--{}\r\n{}\r\n\r\n", self.boundary, headers).as_bytes());
        self.body.extend_from_slice(content);
    }

    fn field(&mut self, key: &str, value: &str) {
        self.part(
            &format!("Content-Disposition: form-data; name=\"{}\"", escape_quotes(key)),
            value.as_bytes(),
        );
    }

    fn finish(mut self) -> Vec<u8> {
        if !self.body.is_empty() {
            self.body.extend_from_slice(b"\r\n");
        }
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_of(content_type: &str) -> &str {
        content_type
            .strip_prefix("multipart/form-data; boundary=")
            .expect("boundary parameter")
    }

    #[test]
    fn encodes_files_then_multi_params_then_params() {
        let files = vec![b"first".to_vec(), b"second".to_vec()];
        let params = BTreeMap::from([("name".to_string(), "office".to_string())]);
        let multi = BTreeMap::from([("tag".to_string(), vec!["a".to_string(), "b".to_string()])]);

        let (body, content_type) = multipart_form("photo", &files, &params, &multi);
        let boundary = boundary_of(&content_type);
        let text = String::from_utf8(body).unwrap();

        assert_eq!(text.matches(&format!("--{}\r\n", boundary)).count(), 5);
        assert!(text.ends_with(&format!("\r\n--{}--\r\n", boundary)));
        assert_eq!(text.matches("name=\"photo\"; filename=").count(), 2);

        let first = text.find("first").unwrap();
        let tag_a = text.find("name=\"tag\"\r\n\r\na").unwrap();
        let tag_b = text.find("name=\"tag\"\r\n\r\nb").unwrap();
        let name = text.find("name=\"name\"\r\n\r\noffice").unwrap();
        assert!(first < tag_a && tag_a < tag_b && tag_b < name);
    }

    #[test]
    fn empty_form_is_only_the_closing_boundary() {
        let (body, content_type) = multipart_form("file", &[], &BTreeMap::new(), &BTreeMap::new());
        let boundary = boundary_of(&content_type);

        assert_eq!(body, format!("--{}--\r\n", boundary).into_bytes());
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let params = BTreeMap::from([("say \"hi\"".to_string(), "x".to_string())]);
        let (body, _) = multipart_form("file", &[], &params, &BTreeMap::new());

        assert!(String::from_utf8(body).unwrap().contains("name=\"say \\\"hi\\\"\""));
    }

    #[test]
    fn boundaries_differ_between_calls() {
        let (_, first) = multipart_form("file", &[], &BTreeMap::new(), &BTreeMap::new());
        let (_, second) = multipart_form("file", &[], &BTreeMap::new(), &BTreeMap::new());
        assert_ne!(first, second);
    }
}
