//! # Resource Trait
//!
//! The contract every remote collection (appointments, patients, therapists,
//! ...) implements so that one generic
//! [`ResourceController`](crate::ResourceController) can manage all of them.
//!
//! Associated types keep the payloads apart: a `Patient` controller accepts a
//! `PatientCreate`, and the compiler rejects a `TherapistCreate`.
//!
//! # Provided Methods
//! [`Resource::apply_update`] has a default implementation performing a
//! shallow merge. Override it only when the update body does not mirror the
//! item's own fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Display};

/// A server-owned entity identified by a server-assigned id.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The server-assigned identifier.
    type Id: Copy + Eq + Display + Debug + Send + Sync + 'static;

    /// Body sent on create.
    type Create: Serialize + Debug + Send + Sync + 'static;

    /// Body sent on update. Fields that serialize to nothing are left alone
    /// by the default merge, so optional fields should be skipped when `None`.
    type Update: Serialize + Debug + Send + Sync + 'static;

    /// Collection endpoint, e.g. `/patients`.
    const ENDPOINT: &'static str;

    /// Singular name used in notifications, e.g. `patient`.
    const LABEL: &'static str;

    /// Plural name used in notifications, e.g. `patients`.
    const LABEL_PLURAL: &'static str;

    /// Whether the list endpoint takes `page`/`size` and answers with a page.
    const PAGINATED: bool = false;

    fn id(&self) -> Self::Id;

    /// Shallow-merges `update` into `self`: every top-level field present in
    /// the serialized update replaces the item's field. `id` never changes.
    fn apply_update(&mut self, update: &Self::Update) -> Result<(), serde_json::Error> {
        let mut current = serde_json::to_value(&*self)?;
        if let (Value::Object(fields), Value::Object(patch)) =
            (&mut current, serde_json::to_value(update)?)
        {
            for (k, v) in patch {
                if k != "id" {
                    fields.insert(k, v);
                }
            }
        }
        *self = serde_json::from_value(current)?;
        Ok(())
    }
}

/// Pagination position of a loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub page_index: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Page size used until the first load says otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
        }
    }
}

impl PageCursor {
    pub fn has_next(&self) -> bool {
        self.page_index.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }
}

/// A list response: either a server page or a plain array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    #[serde(rename_all = "camelCase")]
    Page {
        content: Vec<T>,
        #[serde(default)]
        total_pages: u32,
    },
    Plain(Vec<T>),
}

impl<T> ListPayload<T> {
    /// Splits the payload into its items and the cursor it implies for a
    /// request of `page`/`size`.
    pub fn into_parts(self, page: u32, size: u32) -> (Vec<T>, PageCursor) {
        match self {
            ListPayload::Page {
                content,
                total_pages,
            } => (
                content,
                PageCursor {
                    page_index: page,
                    page_size: size,
                    total_pages,
                },
            ),
            ListPayload::Plain(items) => {
                let total_pages = if items.is_empty() { 0 } else { 1 };
                (
                    items,
                    PageCursor {
                        page_index: 0,
                        page_size: size,
                        total_pages,
                    },
                )
            }
        }
    }
}

/// Capitalizes the first letter of a label (`therapist` -> `Therapist`).
pub(crate) fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: i64,
        title: String,
        #[serde(default)]
        pinned: bool,
    }

    #[derive(Debug, Serialize)]
    struct NoteUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pinned: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
    }

    impl Resource for Note {
        type Id = i64;
        type Create = Note;
        type Update = NoteUpdate;
        const ENDPOINT: &'static str = "/notes";
        const LABEL: &'static str = "note";
        const LABEL_PLURAL: &'static str = "notes";

        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn shallow_merge_only_touches_present_fields() {
        let mut note = Note {
            id: 4,
            title: "Intake".into(),
            pinned: false,
        };
        note.apply_update(&NoteUpdate {
            title: None,
            pinned: Some(true),
            id: Some(99),
        })
        .unwrap();

        assert_eq!(
            note,
            Note {
                id: 4,
                title: "Intake".into(),
                pinned: true
            }
        );
    }

    #[test]
    fn list_payload_accepts_both_shapes() {
        let page: ListPayload<Note> =
            serde_json::from_str(r#"{"content":[{"id":1,"title":"a"}],"totalPages":3}"#).unwrap();
        let (items, cursor) = page.into_parts(2, 10);
        assert_eq!(items.len(), 1);
        assert_eq!(
            cursor,
            PageCursor {
                page_index: 2,
                page_size: 10,
                total_pages: 3
            }
        );

        let plain: ListPayload<Note> =
            serde_json::from_str(r#"[{"id":1,"title":"a"},{"id":2,"title":"b"}]"#).unwrap();
        let (items, cursor) = plain.into_parts(5, 20);
        assert_eq!(items.len(), 2);
        assert_eq!(cursor.page_index, 0);
        assert_eq!(cursor.total_pages, 1);

        let empty: ListPayload<Note> = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.into_parts(0, 10).1.total_pages, 0);
    }

    #[test]
    fn cursor_navigation() {
        let cursor = PageCursor {
            page_index: 1,
            page_size: 10,
            total_pages: 3,
        };
        assert!(cursor.has_next());
        assert!(cursor.has_previous());
        assert!(!PageCursor::default().has_next());
    }

    #[test]
    fn cursor_at_the_last_index_has_no_next() {
        let cursor = PageCursor {
            page_index: u32::MAX,
            page_size: 10,
            total_pages: 0,
        };
        assert!(!cursor.has_next());
        assert!(cursor.has_previous());
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(title_case("therapist"), "Therapist");
        assert_eq!(title_case(""), "");
    }
}
