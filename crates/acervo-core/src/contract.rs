//! The canonical API contract.
//!
//! A contract is the single authoritative table of the API's operations:
//! id, verb, path template, and documentation strings. The HTTP router is
//! built from it and the OpenAPI generator walks it, so routing and
//! documentation cannot drift apart.

use http::Method;

/// Operation ids of the Acervo API, shared by dispatch and documentation.
pub mod ops {
    /// `POST /{collection}`
    pub const CREATE_ITEM: &str = "createItem";
    /// `GET /{collection}`
    pub const LIST_COLLECTION: &str = "listCollection";
    /// `GET /{collection}/{rm}`
    pub const LIST_BY_OWNER: &str = "listByOwner";
    /// `DELETE /{collection}/{rm}/{id}`
    pub const DELETE_ITEM: &str = "deleteItem";
    /// `GET /tema/{rm}`
    pub const GET_THEME: &str = "getTheme";
}

/// The contract of one deployable API.
#[derive(Debug, Clone)]
pub struct ApiContract {
    name: String,
    version: String,
    description: String,
    tags: Vec<TagSpec>,
    operations: Vec<Operation>,
}

impl ApiContract {
    /// Starts building a contract with the given API name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ApiContractBuilder {
        ApiContractBuilder::new(name)
    }

    /// Returns the API name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the API version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the API description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared documentation tags.
    #[must_use]
    pub fn tags(&self) -> &[TagSpec] {
        &self.tags
    }

    /// Returns all operations in declaration order.
    ///
    /// Declaration order is dispatch order: the router tries earlier
    /// operations first, which is how the fixed `/tema/{rm}` route wins over
    /// the generic `/{collection}/{rm}` pattern.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Looks up an operation by id.
    #[must_use]
    pub fn get_operation(&self, operation_id: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|operation| operation.operation_id == operation_id)
    }
}

/// Builder for [`ApiContract`].
#[derive(Debug, Default)]
pub struct ApiContractBuilder {
    name: String,
    version: String,
    description: String,
    tags: Vec<TagSpec>,
    operations: Vec<Operation>,
}

impl ApiContractBuilder {
    /// Creates a builder with the given API name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.0.0".to_string(),
            ..Self::default()
        }
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares a documentation tag.
    #[must_use]
    pub fn tag(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tags.push(TagSpec {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Adds an operation.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Finalizes the contract.
    #[must_use]
    pub fn build(self) -> ApiContract {
        ApiContract {
            name: self.name,
            version: self.version,
            description: self.description,
            tags: self.tags,
            operations: self.operations,
        }
    }
}

/// A documentation tag: a named group of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Tag name, referenced by operations.
    pub name: String,
    /// Human-readable group description.
    pub description: String,
}

/// One operation: a verb, a path template, and its documentation.
#[derive(Debug, Clone)]
pub struct Operation {
    operation_id: String,
    method: Method,
    path: String,
    tag: String,
    summary: String,
    parameters: Vec<PathParam>,
    request_body: Option<String>,
    responses: Vec<ResponseSpec>,
}

impl Operation {
    /// Starts building an operation with the given id.
    #[must_use]
    pub fn builder(operation_id: impl Into<String>) -> OperationBuilder {
        OperationBuilder::new(operation_id)
    }

    /// Returns the operation id.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template (`{name}` marks a parameter segment).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the documentation tag this operation belongs to.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the one-line summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the documented path parameters in template order.
    #[must_use]
    pub fn parameters(&self) -> &[PathParam] {
        &self.parameters
    }

    /// Returns the request body schema name, when the operation takes one.
    #[must_use]
    pub fn request_body(&self) -> Option<&str> {
        self.request_body.as_deref()
    }

    /// Returns the documented responses.
    #[must_use]
    pub fn responses(&self) -> &[ResponseSpec] {
        &self.responses
    }
}

/// Builder for [`Operation`].
#[derive(Debug)]
pub struct OperationBuilder {
    operation_id: String,
    method: Method,
    path: String,
    tag: String,
    summary: String,
    parameters: Vec<PathParam>,
    request_body: Option<String>,
    responses: Vec<ResponseSpec>,
}

impl OperationBuilder {
    /// Creates a builder for the given operation id. Method defaults to GET.
    #[must_use]
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            method: Method::GET,
            path: "/".to_string(),
            tag: String::new(),
            summary: String::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the path template.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the documentation tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Sets the one-line summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Documents a path parameter. Call in template order.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(PathParam {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Declares a required JSON request body referencing a component schema.
    #[must_use]
    pub fn request_body(mut self, schema: impl Into<String>) -> Self {
        self.request_body = Some(schema.into());
        self
    }

    /// Documents a response.
    #[must_use]
    pub fn response(mut self, status: u16, description: impl Into<String>) -> Self {
        self.responses.push(ResponseSpec {
            status,
            description: description.into(),
        });
        self
    }

    /// Finalizes the operation.
    #[must_use]
    pub fn build(self) -> Operation {
        Operation {
            operation_id: self.operation_id,
            method: self.method,
            path: self.path,
            tag: self.tag,
            summary: self.summary,
            parameters: self.parameters,
            request_body: self.request_body,
            responses: self.responses,
        }
    }
}

/// A documented path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Parameter name, matching a `{name}` template segment.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

/// A documented response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable description.
    pub description: String,
}

/// The Acervo API contract: four generic collection operations plus the
/// theme lookup.
#[must_use]
pub fn api_contract() -> ApiContract {
    const COLLECTION_PARAM: &str = "Nome da coleção (ex: livros, produtos)";
    const RM_PARAM: &str = "RM do usuário";

    ApiContract::builder("API de Itens por RM (genérica)")
        .version(env!("CARGO_PKG_VERSION"))
        .description("API que armazena itens genéricos identificados por rm.")
        .tag(
            "Genérico",
            "Operações genéricas para qualquer coleção (livros, produtos, etc)",
        )
        .tag("Tema", "Consulta de temas por RM")
        .operation(
            Operation::builder(ops::GET_THEME)
                .method(Method::GET)
                .path("/tema/{rm}")
                .tag("Tema")
                .summary("Consulta o tema associado a um RM")
                .path_param("rm", RM_PARAM)
                .response(200, "Tema associado ao RM")
                .response(400, "RM inválido")
                .response(404, "Tema não encontrado")
                .build(),
        )
        .operation(
            Operation::builder(ops::CREATE_ITEM)
                .method(Method::POST)
                .path("/{collection}")
                .tag("Genérico")
                .summary("Insere um item genérico em qualquer coleção")
                .path_param("collection", COLLECTION_PARAM)
                .request_body("GenericItem")
                .response(201, "Item criado com sucesso")
                .response(400, "Campo 'rm' ausente")
                .build(),
        )
        .operation(
            Operation::builder(ops::LIST_COLLECTION)
                .method(Method::GET)
                .path("/{collection}")
                .tag("Genérico")
                .summary("Lista todos os itens de uma coleção")
                .path_param("collection", COLLECTION_PARAM)
                .response(200, "Lista de itens")
                .build(),
        )
        .operation(
            Operation::builder(ops::LIST_BY_OWNER)
                .method(Method::GET)
                .path("/{collection}/{rm}")
                .tag("Genérico")
                .summary("Lista itens de uma coleção filtrados por RM")
                .path_param("collection", COLLECTION_PARAM)
                .path_param("rm", RM_PARAM)
                .response(200, "Itens filtrados por RM")
                .build(),
        )
        .operation(
            Operation::builder(ops::DELETE_ITEM)
                .method(Method::DELETE)
                .path("/{collection}/{rm}/{id}")
                .tag("Genérico")
                .summary("Exclui item pelo RM e ID em uma coleção")
                .path_param("collection", COLLECTION_PARAM)
                .path_param("rm", RM_PARAM)
                .path_param("id", "ID do item")
                .response(200, "Item excluído")
                .response(404, "Item não encontrado")
                .build(),
        )
        .build()
}
