//! OpenAPI document types and generation.
//!
//! This module models the subset of OpenAPI 3.0 the Acervo API documents
//! itself with, and a generator that walks the canonical [`ApiContract`]
//! into a document. Because the router is built from the same contract,
//! the served documentation can never disagree with dispatch.

use acervo_core::{ApiContract, Operation as ContractOperation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};

/// The OpenAPI version the generated document declares.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// OpenAPI document root object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// API paths and operations.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components (schemas).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    /// Tags for API grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// API metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A path item containing the operations of a single path template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationObject>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationObject>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationObject>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationObject>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationObject>,
}

/// An API operation as documented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationObject {
    /// Unique operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Tags for grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    /// Responses by status code.
    pub responses: IndexMap<String, Response>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Query string parameter.
    Query,
    /// URL path parameter.
    Path,
}

/// An operation parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

/// Media type content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Response definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Description (required by the specification).
    pub description: String,
    /// Response content by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// Reusable components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Reusable schemas.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

/// API tag for grouping operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
}

/// JSON Schema definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to another schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Whether fields outside `properties` are allowed. Open records say yes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<bool>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self {
            schema_type: Some(SchemaType::String),
            ..Self::default()
        }
    }

    /// Create an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            ..Self::default()
        }
    }

    /// Create a reference schema.
    #[must_use]
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self {
            reference: Some(ref_path.into()),
            ..Self::default()
        }
    }

    /// Add a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a property to an object schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Self) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Allow or forbid properties outside `properties`.
    #[must_use]
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Attach an example value.
    #[must_use]
    pub fn with_example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }
}

/// The `GenericItem` component: an open object whose only fixed field is the
/// required `rm` string. Everything else is caller-defined.
#[must_use]
pub fn generic_item_schema() -> Schema {
    Schema::object()
        .property(
            "rm",
            Schema::string().with_description("RM do usuário"),
        )
        .required_property("rm")
        .additional_properties(true)
        .with_example(serde_json::json!({
            "rm": "2023001",
            "nome": "Exemplo",
            "preco": 99.9
        }))
}

/// Generator converting an [`ApiContract`] into an OpenAPI document.
///
/// Component schemas referenced by operations must be registered up front;
/// generation fails loudly on a dangling reference instead of emitting a
/// document Swagger UI cannot render.
///
/// # Example
///
/// ```
/// use acervo_core::api_contract;
/// use acervo_docs::{generic_item_schema, OpenApiGenerator};
///
/// let document = OpenApiGenerator::new()
///     .schema("GenericItem", generic_item_schema())
///     .generate(&api_contract())
///     .unwrap();
/// assert_eq!(document.openapi, "3.0.0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenApiGenerator {
    schemas: IndexMap<String, Schema>,
}

impl OpenApiGenerator {
    /// Creates a generator with no registered schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named component schema.
    #[must_use]
    pub fn schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    /// Generates the document for a contract.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::UnsupportedMethod`] for a method with no path
    /// item slot and [`DocsError::MissingSchema`] when an operation's
    /// request body references an unregistered schema.
    pub fn generate(&self, contract: &ApiContract) -> DocsResult<OpenApi> {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();

        for operation in contract.operations() {
            let converted = self.convert_operation(operation)?;
            let path_item = paths.entry(operation.path().to_string()).or_default();

            match operation.method().as_str() {
                "GET" => path_item.get = Some(converted),
                "PUT" => path_item.put = Some(converted),
                "POST" => path_item.post = Some(converted),
                "DELETE" => path_item.delete = Some(converted),
                "PATCH" => path_item.patch = Some(converted),
                other => {
                    return Err(DocsError::UnsupportedMethod {
                        operation_id: operation.operation_id().to_string(),
                        method: other.to_string(),
                    })
                }
            }
        }

        let tags = contract
            .tags()
            .iter()
            .map(|tag| Tag {
                name: tag.name.clone(),
                description: Some(tag.description.clone()),
            })
            .collect();

        let components = if self.schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: self.schemas.clone(),
            })
        };

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: contract.name().to_string(),
                version: contract.version().to_string(),
                description: (!contract.description().is_empty())
                    .then(|| contract.description().to_string()),
            },
            paths,
            components,
            tags,
        })
    }

    /// Generates the document and serializes it to pretty JSON.
    ///
    /// # Errors
    ///
    /// The conditions of [`generate`](Self::generate), plus serialization
    /// failures.
    pub fn generate_json(&self, contract: &ApiContract) -> DocsResult<String> {
        let document = self.generate(contract)?;
        serde_json::to_string_pretty(&document).map_err(DocsError::from)
    }

    fn convert_operation(&self, operation: &ContractOperation) -> DocsResult<OperationObject> {
        let parameters = operation
            .parameters()
            .iter()
            .map(|param| Parameter {
                name: param.name.clone(),
                location: ParameterIn::Path,
                description: Some(param.description.clone()),
                required: true,
                schema: Some(Schema::string()),
            })
            .collect();

        let request_body = match operation.request_body() {
            Some(schema_name) => {
                if !self.schemas.contains_key(schema_name) {
                    return Err(DocsError::MissingSchema {
                        operation_id: operation.operation_id().to_string(),
                        schema: schema_name.to_string(),
                    });
                }
                let mut content = IndexMap::new();
                content.insert(
                    "application/json".to_string(),
                    MediaType {
                        schema: Some(Schema::reference(format!(
                            "#/components/schemas/{schema_name}"
                        ))),
                    },
                );
                Some(RequestBody {
                    required: true,
                    content,
                })
            }
            None => None,
        };

        let mut responses: IndexMap<String, Response> = IndexMap::new();
        for spec in operation.responses() {
            responses.insert(
                spec.status.to_string(),
                Response {
                    description: spec.description.clone(),
                    content: IndexMap::new(),
                },
            );
        }
        if responses.is_empty() {
            responses.insert(
                "200".to_string(),
                Response {
                    description: "Successful response".to_string(),
                    content: IndexMap::new(),
                },
            );
        }

        Ok(OperationObject {
            operation_id: operation.operation_id().to_string(),
            summary: (!operation.summary().is_empty())
                .then(|| operation.summary().to_string()),
            tags: if operation.tag().is_empty() {
                Vec::new()
            } else {
                vec![operation.tag().to_string()]
            },
            parameters,
            request_body,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::{api_contract, ops, ApiContract, Operation};
    use http::Method;

    fn generator() -> OpenApiGenerator {
        OpenApiGenerator::new().schema("GenericItem", generic_item_schema())
    }

    #[test]
    fn test_generate_document_for_api_contract() {
        let document = generator()
            .generate(&api_contract())
            .expect("generation should succeed");

        assert_eq!(document.openapi, "3.0.0");
        assert_eq!(document.info.title, "API de Itens por RM (genérica)");
        assert_eq!(
            document.info.description.as_deref(),
            Some("API que armazena itens genéricos identificados por rm.")
        );

        // Five operations across four path templates.
        assert_eq!(document.paths.len(), 4);
        let collection = &document.paths["/{collection}"];
        assert!(collection.get.is_some());
        assert!(collection.post.is_some());
        assert!(document.paths["/{collection}/{rm}/{id}"].delete.is_some());
        assert!(document.paths["/tema/{rm}"].get.is_some());

        let tags: Vec<_> = document.tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(tags, vec!["Genérico", "Tema"]);
    }

    #[test]
    fn test_generic_item_component() {
        let document = generator()
            .generate(&api_contract())
            .expect("generation should succeed");

        let components = document.components.expect("components present");
        let schema = &components.schemas["GenericItem"];

        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(schema.required, vec!["rm"]);
        assert_eq!(schema.additional_properties, Some(true));
        assert_eq!(
            schema.properties["rm"].description.as_deref(),
            Some("RM do usuário")
        );
        let example = schema.example.as_ref().expect("example present");
        assert_eq!(example["rm"], "2023001");
    }

    #[test]
    fn test_wire_serialization_shape() {
        let json = serde_json::to_value(
            generator()
                .generate(&api_contract())
                .expect("generation should succeed"),
        )
        .expect("serialization should work");

        let post = &json["paths"]["/{collection}"]["post"];
        assert_eq!(post["operationId"], "createItem");
        assert_eq!(post["summary"], "Insere um item genérico em qualquer coleção");
        assert_eq!(post["parameters"][0]["in"], "path");
        assert_eq!(post["parameters"][0]["required"], true);
        assert_eq!(post["parameters"][0]["schema"]["type"], "string");
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/GenericItem"
        );
        assert_eq!(post["responses"]["201"]["description"], "Item criado com sucesso");

        // Schema extras keep their OpenAPI casing.
        let item = &json["components"]["schemas"]["GenericItem"];
        assert_eq!(item["additionalProperties"], true);
        assert_eq!(item["example"]["preco"], 99.9);
    }

    #[test]
    fn test_missing_schema_is_rejected() {
        let err = OpenApiGenerator::new()
            .generate(&api_contract())
            .expect_err("unregistered schema must fail");

        assert!(matches!(
            err,
            DocsError::MissingSchema { operation_id, schema }
                if operation_id == ops::CREATE_ITEM && schema == "GenericItem"
        ));
    }

    #[test]
    fn test_unsupported_method_is_rejected() {
        let contract = ApiContract::builder("probe")
            .operation(
                Operation::builder("connectSomewhere")
                    .method(Method::CONNECT)
                    .path("/probe")
                    .build(),
            )
            .build();

        let err = generator()
            .generate(&contract)
            .expect_err("CONNECT has no path item slot");
        assert!(matches!(err, DocsError::UnsupportedMethod { .. }));
    }

    #[test]
    fn test_operation_without_responses_gets_default_200() {
        let contract = ApiContract::builder("probe")
            .operation(Operation::builder("ping").path("/ping").build())
            .build();

        let document = generator()
            .generate(&contract)
            .expect("generation should succeed");
        let ping = document.paths["/ping"].get.as_ref().expect("GET present");
        assert_eq!(ping.responses["200"].description, "Successful response");
    }

    #[test]
    fn test_document_round_trips_through_serde() {
        let document = generator()
            .generate(&api_contract())
            .expect("generation should succeed");
        let json = serde_json::to_string(&document).expect("serialization should work");
        let back: OpenApi = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(back.paths.len(), document.paths.len());
        assert_eq!(back.info.title, document.info.title);
    }
}
