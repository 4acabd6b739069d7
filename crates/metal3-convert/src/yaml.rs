//! Reading and writing of multi-document YAML streams.
use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse document {index}"))]
    ParseDocument {
        source: serde_yaml::Error,
        index: usize,
    },

    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to write YAML document separator"))]
    WriteDocumentSeparator { source: std::io::Error },
}

/// Parses all documents of a YAML stream. JSON is parsed as well, being a subset of YAML.
/// Empty documents are skipped.
pub fn read_documents(input: &str) -> Result<Vec<Value>, Error> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let document = Value::deserialize(document).context(ParseDocumentSnafu { index })?;
        if !document.is_null() {
            documents.push(document);
        }
    }

    Ok(documents)
}

/// Writes every document with a leading document separator (`---`).
pub fn write_documents<T, W>(documents: &[T], mut writer: W) -> Result<(), Error>
where
    T: Serialize,
    W: Write,
{
    for document in documents {
        writer
            .write_all(b"---\n")
            .context(WriteDocumentSeparatorSnafu)?;
        serde_yaml::to_writer(&mut writer, document).context(SerializeYamlSnafu)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::single_document("kind: Metal3Cluster\n", 1)]
    #[case::explicit_documents("---\nkind: Metal3Cluster\n---\nkind: Metal3Machine\n", 2)]
    #[case::trailing_separator("kind: Metal3Cluster\n---\n", 1)]
    #[case::json(r#"{"kind": "Metal3Cluster"}"#, 1)]
    #[case::empty("", 0)]
    fn read(#[case] input: &str, #[case] expected: usize) {
        let documents = read_documents(input).unwrap();
        assert_eq!(documents.len(), expected);
    }

    #[test]
    fn read_reports_broken_document() {
        let input = "kind: Metal3Cluster\n---\nkind: [Metal3Machine\n";

        let err = read_documents(input).unwrap_err();
        assert!(matches!(err, Error::ParseDocument { index: 1, .. }));
    }

    #[test]
    fn write() {
        let mut output = Vec::new();
        write_documents(
            &[
                json!({"kind": "Metal3Cluster"}),
                json!({"kind": "Metal3Machine", "spec": {"image": {"url": "http://example.com"}}}),
            ],
            &mut output,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            indoc! {"
                ---
                kind: Metal3Cluster
                ---
                kind: Metal3Machine
                spec:
                  image:
                    url: http://example.com
            "}
        );
    }
}
