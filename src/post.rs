//! The blog post entity and its input / output shapes.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored in place of `content` when a post is created without one.
pub const PLACEHOLDER_CONTENT: &str = "Contenido no disponible";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Tag {
    #[validate(length(min = 2, max = 30))]
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Author {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub tags: Vec<Tag>,
    pub author: Option<Author>,
}

impl Post {
    pub(crate) fn from_create(id: u64, input: PostCreate) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content.unwrap_or_else(|| PLACEHOLDER_CONTENT.to_owned()),
            tags: input.tags,
            author: input.author,
        }
    }

    /// Overwrites only the fields present in `update`.
    pub(crate) fn apply(&mut self, update: PostUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(author) = update.author {
            self.author = Some(author);
        }
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary { id: self.id, title: self.title.clone() }
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PostCreate {
    #[validate(
        length(min = 3, max = 100),
        custom(function = "crate::validation::reject_prohibited_words")
    )]
    pub title: String,
    #[validate(length(min = 10, max = 1000))]
    pub content: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    #[validate(nested)]
    pub author: Option<Author>,
}

impl PostCreate {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            tags: Vec::new(),
            author: None,
        }
    }
}

/// Body of `PUT /posts/{post_id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct PostUpdate {
    #[serde(default)]
    #[validate(
        length(min = 3, max = 100),
        custom(function = "crate::validation::reject_prohibited_words")
    )]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 10, max = 1000))]
    pub content: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    #[validate(nested)]
    pub author: Option<Author>,
}

/// The reduced shape served when content is not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: u64,
    pub title: String,
}

/// What a single-post endpoint sends back.
///
/// Serialized without a tag: a `Full` view is the post itself, a `Summary`
/// view is `{id, title}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostView {
    Full(Post),
    Summary(PostSummary),
}

impl PostView {
    pub fn new(post: Post, include_content: bool) -> Self {
        if include_content {
            Self::Full(post)
        } else {
            Self::Summary(post.summary())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::from_create(7, PostCreate::new("Original", "Contenido original"))
    }

    #[test]
    fn create_without_content_gets_placeholder() {
        let input: PostCreate = serde_json::from_str(r#"{"title": "Sin cuerpo"}"#).unwrap();
        let post = Post::from_create(1, input);
        assert_eq!(post.content, PLACEHOLDER_CONTENT);
        assert!(post.tags.is_empty());
        assert_eq!(post.author, None);
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut p = post();
        p.apply(PostUpdate { content: Some("Nuevo contenido aqui".into()), ..Default::default() });
        assert_eq!(p.title, "Original");
        assert_eq!(p.content, "Nuevo contenido aqui");
        assert_eq!(p.id, 7);
    }

    #[test]
    fn apply_replaces_tags_in_given_order() {
        let mut p = post();
        p.apply(PostUpdate {
            tags: Some(vec![Tag::new("rust"), Tag::new("api")]),
            ..Default::default()
        });
        let names: Vec<_> = p.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["rust", "api"]);
    }

    #[test]
    fn summary_view_serializes_id_and_title_only() {
        let view = PostView::new(post(), false);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "title": "Original"}));
    }

    #[test]
    fn full_view_serializes_every_field() {
        let json = serde_json::to_value(PostView::new(post(), true)).unwrap();
        assert_eq!(json["content"], "Contenido original");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json["author"].is_null());
    }
}
