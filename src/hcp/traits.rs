//! Common traits and JSON:API envelopes for TFE resources

use serde::{Deserialize, Serialize};

use crate::hcp::pagination::Page;
use crate::hcp::PaginationMeta;

/// Common trait for all TFE resources (organizations, projects, workspaces, ...)
///
/// Gives the pagination walker and import lookups a uniform way to match
/// a remote entity by name or ID.
pub trait TfeResource {
    /// Get the resource ID
    fn id(&self) -> &str;

    /// Get the human-readable name
    fn name(&self) -> &str;

    /// Check if the resource matches by name or ID
    ///
    /// Default implementation checks for exact match on either field.
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input
    }
}

/// Trait for API responses that contain paginated data
pub trait PaginatedResponse<T> {
    /// Consume self and return the data items
    fn into_data(self) -> Vec<T>;
    /// Get reference to pagination metadata
    fn meta(&self) -> Option<&PaginationMeta>;

    /// Convert into a walker page, keeping the cursor
    fn into_page(self) -> Page<T>
    where
        Self: Sized,
    {
        let pagination = self.meta().and_then(|m| m.pagination.clone());
        Page {
            items: self.into_data(),
            pagination,
        }
    }
}

/// Generic API list response wrapper for paginated endpoints
#[derive(Deserialize, Debug)]
pub struct ApiListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}

impl<T> PaginatedResponse<T> for ApiListResponse<T> {
    fn into_data(self) -> Vec<T> {
        self.data
    }

    fn meta(&self) -> Option<&PaginationMeta> {
        self.meta.as_ref()
    }
}

/// Single-resource JSON:API document (`{"data": {...}}`)
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiDocument<T> {
    pub data: T,
}

impl<T> ApiDocument<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Outgoing JSON:API resource object used in create/update bodies
#[derive(Serialize, Debug, Clone)]
pub struct ResourceObject<A, R = ()> {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub attributes: A,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<R>,
}

impl<A> ResourceObject<A> {
    pub fn new(resource_type: &'static str, attributes: A) -> Self {
        Self {
            resource_type,
            attributes,
            relationships: None,
        }
    }

    /// Attach a relationships member
    pub fn with_relationships<R>(self, relationships: Option<R>) -> ResourceObject<A, R> {
        ResourceObject {
            resource_type: self.resource_type,
            attributes: self.attributes,
            relationships,
        }
    }
}

/// Relationship reference in a request body (`{"data": {"type": ..., "id": ...}}`)
#[derive(Serialize, Debug, Clone)]
pub struct RelationshipRef {
    pub data: RelationshipRefData,
}

#[derive(Serialize, Debug, Clone)]
pub struct RelationshipRefData {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub id: String,
}

impl RelationshipRef {
    pub fn new(resource_type: &'static str, id: &str) -> Self {
        Self {
            data: RelationshipRefData {
                resource_type,
                id: id.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        id: String,
        name: String,
    }

    impl TfeResource for TestResource {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_matches_by_id_or_name() {
        let resource = TestResource {
            id: "res-123".to_string(),
            name: "my-resource".to_string(),
        };
        assert!(resource.matches("res-123"));
        assert!(resource.matches("my-resource"));
        assert!(!resource.matches("other"));
    }

    #[test]
    fn test_api_list_response_into_page() {
        let response: ApiListResponse<serde_json::Value> =
            serde_json::from_value(serde_json::json!({
                "data": [{"id": "item-1"}],
                "meta": {
                    "pagination": {
                        "current-page": 1,
                        "total-pages": 3,
                        "next-page": 2,
                        "total-count": 5
                    }
                }
            }))
            .unwrap();
        let page = response.into_page();
        assert_eq!(page.items.len(), 1);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.next_page, Some(2));
    }

    #[test]
    fn test_api_list_response_without_meta() {
        let response: ApiListResponse<serde_json::Value> =
            serde_json::from_value(serde_json::json!({
                "data": [{"id": "item-1"}]
            }))
            .unwrap();
        assert!(response.meta().is_none());
        let page = response.into_page();
        assert!(page.pagination.is_none());
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_resource_object_serialization() {
        #[derive(Serialize)]
        struct Attrs {
            name: &'static str,
        }

        let obj = ResourceObject::new("projects", Attrs { name: "core" });
        let value = serde_json::to_value(ApiDocument::new(&obj)).unwrap();
        assert_eq!(value["data"]["type"], "projects");
        assert_eq!(value["data"]["attributes"]["name"], "core");
        assert!(value["data"].get("relationships").is_none());

        let obj = obj.with_relationships(Some(serde_json::json!({
            "project": RelationshipRef::new("projects", "prj-1")
        })));
        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(value["relationships"]["project"]["data"]["id"], "prj-1");
    }

    #[test]
    fn test_relationship_ref_serialization() {
        let rel = RelationshipRef::new("projects", "prj-1");
        let value = serde_json::to_value(&rel).unwrap();
        assert_eq!(value["data"]["type"], "projects");
        assert_eq!(value["data"]["id"], "prj-1");
    }
}
