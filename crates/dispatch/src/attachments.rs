//! Attachment assembly for one message.

use std::path::Path;

use courier_core::{AttachmentSpec, PlaceholderCache, Recipient, render};

use crate::config::DispatchConfig;
use crate::error::BuildError;

/// Build the ordered attachment list for one recipient: the rendered
/// attachment first, then one static attachment per configured content-id
/// mapping, in declaration order.
///
/// The attachment-body template is re-read on every call and rendered with
/// the same cache as the enclosing message, so placeholder values agree
/// between body and attachment.
pub async fn build_attachments(
    recipient: &Recipient,
    cache: &mut PlaceholderCache,
    config: &DispatchConfig,
) -> Result<Vec<AttachmentSpec>, BuildError> {
    let template = tokio::fs::read_to_string(&config.attachment_template_path)
        .await
        .map_err(|source| BuildError::Template {
            what: "attachment body template",
            path: config.attachment_template_path.clone(),
            source,
        })?;

    let mut attachments = vec![AttachmentSpec::Rendered {
        filename: config.attachment_filename.clone(),
        content: render(&template, recipient, cache),
        content_type: config.attachment_content_type.clone(),
    }];

    for mapping in &config.cid_mappings {
        let content =
            tokio::fs::read(&mapping.path)
                .await
                .map_err(|source| BuildError::AttachmentSource {
                    path: mapping.path.clone(),
                    source,
                })?;
        attachments.push(AttachmentSpec::Static {
            content_id: mapping.cid.clone(),
            filename: file_name_of(&mapping.path),
            content,
            content_type: content_type_for(&mapping.path),
        });
    }

    Ok(attachments)
}

/// Displayed filename: the final segment of the source path.
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map_or_else(|| "application/octet-stream".to_owned(), |mime| mime.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::CidMapping;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("courier-attach-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn base_config(dir: &Path) -> DispatchConfig {
        let toml = r#"
            from_name = "S"
            from_email = "s@example.com"
            subject = "x"
        "#;
        let mut config: DispatchConfig = toml::from_str(toml).unwrap();
        config.enable_attachment = true;
        config.attachment_template_path = dir.join("attach.html");
        config
    }

    #[tokio::test]
    async fn rendered_attachment_comes_first_then_statics_in_order() {
        let dir = temp_dir("order");
        std::fs::write(dir.join("attach.html"), "<p>For {{user}}</p>").unwrap();
        std::fs::write(dir.join("logo.png"), [1u8, 2, 3]).unwrap();
        std::fs::write(dir.join("banner.jpg"), [4u8, 5]).unwrap();

        let mut config = base_config(&dir);
        config.cid_mappings = vec![
            CidMapping {
                cid: "logo".into(),
                path: dir.join("logo.png"),
            },
            CidMapping {
                cid: "banner".into(),
                path: dir.join("banner.jpg"),
            },
        ];

        let recipient = Recipient::parse("alice@example.com").unwrap();
        let mut cache = PlaceholderCache::new();
        let attachments = build_attachments(&recipient, &mut cache, &config)
            .await
            .unwrap();

        assert_eq!(attachments.len(), 3);
        match &attachments[0] {
            AttachmentSpec::Rendered { content, .. } => {
                assert_eq!(content, "<p>For alice</p>");
            }
            AttachmentSpec::Static { .. } => panic!("rendered attachment must come first"),
        }
        match &attachments[1] {
            AttachmentSpec::Static {
                content_id,
                filename,
                content_type,
                ..
            } => {
                assert_eq!(content_id, "logo");
                assert_eq!(filename, "logo.png");
                assert_eq!(content_type, "image/png");
            }
            AttachmentSpec::Rendered { .. } => panic!("expected static attachment"),
        }
        assert_eq!(attachments[2].filename(), "banner.jpg");
    }

    #[tokio::test]
    async fn missing_static_source_is_attachment_source_error() {
        let dir = temp_dir("missing-static");
        std::fs::write(dir.join("attach.html"), "x").unwrap();

        let mut config = base_config(&dir);
        config.cid_mappings = vec![CidMapping {
            cid: "gone".into(),
            path: dir.join("does-not-exist.png"),
        }];

        let recipient = Recipient::parse("a@example.com").unwrap();
        let mut cache = PlaceholderCache::new();
        let err = build_attachments(&recipient, &mut cache, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::AttachmentSource { .. }));
    }

    #[tokio::test]
    async fn missing_template_is_fatal_template_error() {
        let dir = temp_dir("missing-template");
        let config = base_config(&dir);

        let recipient = Recipient::parse("a@example.com").unwrap();
        let mut cache = PlaceholderCache::new();
        let err = build_attachments(&recipient, &mut cache, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));
    }

    #[test]
    fn content_type_guessing() {
        assert_eq!(content_type_for(Path::new("a/b.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("x.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("photo.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }
}
