//! Route catalogue of the mock APIs and the two geometry endpoints.
//!
//! The catalogue only describes routes and their request and response shapes,
//! it does not dispatch requests. The geometry endpoints are plain functions
//! from request body to [`Reply`], to be mounted by whatever web framework
//! hosts them.

use super::geojson::{GeoJsonType, Geometry};
use super::output::JSONError;
use super::validate::Validator;
use log::debug;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Tasks,
    Auth,
    Marketplace,
    Geojson,
    Petstore,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Path,
    Query,
    Header,
}

/// A path, query or header parameter. Path parameters are always required.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    #[serde(rename = "in")]
    pub location: Location,
    pub kind: &'static str,
    pub required: bool,
}

/// Request body, `schema` names an entry of [`SCHEMAS`] or a primitive.
/// A `[]` suffix marks an array of that schema.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Body {
    pub schema: &'static str,
    pub required: bool,
}

/// A declared response; `status: None` is the catch-all `default` response.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Response {
    pub status: Option<u16>,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<&'static str>,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Route {
    pub group: Group,
    pub method: Method,
    pub path: &'static str,
    pub summary: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "is_empty")]
    pub security: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub params: &'static [Param],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    pub responses: &'static [Response],
}

fn is_empty<T>(slice: &&[T]) -> bool {
    slice.is_empty()
}

impl Route {
    pub fn statuses(&self) -> impl Iterator<Item = u16> + '_ {
        self.responses.iter().filter_map(|r| r.status)
    }

    pub fn declares(&self, status: u16) -> bool {
        self.statuses().any(|s| s == status)
    }

    /// Every schema reference of the request body and the responses.
    pub fn schema_refs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.body
            .map(|body| body.schema)
            .into_iter()
            .chain(self.responses.iter().filter_map(|r| r.schema))
    }
}

/// A member of a named request or response shape.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Schema {
    pub group: Group,
    pub name: &'static str,
    pub fields: &'static [Field],
}

const fn response(status: u16, description: &'static str) -> Response {
    Response {
        status: Some(status),
        description,
        schema: None,
    }
}

const fn returns(status: u16, description: &'static str, schema: &'static str) -> Response {
    Response {
        status: Some(status),
        description,
        schema: Some(schema),
    }
}

const fn otherwise(description: &'static str) -> Response {
    Response {
        status: None,
        description,
        schema: None,
    }
}

const fn otherwise_returns(description: &'static str, schema: &'static str) -> Response {
    Response {
        status: None,
        description,
        schema: Some(schema),
    }
}

const fn path(name: &'static str, kind: &'static str) -> Param {
    Param {
        name,
        location: Location::Path,
        kind,
        required: true,
    }
}

const fn query(name: &'static str, kind: &'static str) -> Param {
    Param {
        name,
        location: Location::Query,
        kind,
        required: false,
    }
}

const fn header(name: &'static str, kind: &'static str) -> Param {
    Param {
        name,
        location: Location::Header,
        kind,
        required: false,
    }
}

const fn body(schema: &'static str) -> Option<Body> {
    Some(Body {
        schema,
        required: true,
    })
}

const fn optional_body(schema: &'static str) -> Option<Body> {
    Some(Body {
        schema,
        required: false,
    })
}

const fn field(name: &'static str, kind: &'static str) -> Field {
    Field {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: &'static str) -> Field {
    Field {
        name,
        kind,
        required: false,
    }
}

const ROUTE: Route = Route {
    group: Group::Tasks,
    method: Method::Get,
    path: "",
    summary: "",
    description: None,
    security: &[],
    params: &[],
    body: None,
    responses: &[],
};

const BEARER: &[&str] = &["bearerAuth"];
const API_KEY: &[&str] = &["apiKeyAuth"];
const PETSTORE_AUTH: &[&str] = &["petstore_auth"];
const LIMIT: Param = query("limit", "integer");
const OFFSET: Param = query("offset", "integer");
const ORDER_LINES: &str = "{productId: string, quantity: integer}[]";

pub static ROUTES: &[Route] = &[
    Route {
        path: "/tasks",
        summary: "List Tasks",
        description: Some("Retrieve a list of all tasks."),
        responses: &[returns(200, "A JSON array of task objects.", "Task[]")],
        ..ROUTE
    },
    Route {
        method: Method::Post,
        path: "/tasks",
        summary: "Create Task",
        description: Some("Create a new task."),
        body: body("TaskInput"),
        responses: &[returns(201, "Task created successfully.", "Task")],
        ..ROUTE
    },
    Route {
        path: "/tasks/{taskId}",
        summary: "Get Task",
        description: Some("Retrieve a single task by its ID."),
        params: &[path("taskId", "string")],
        responses: &[
            returns(200, "Task details retrieved successfully.", "Task"),
            response(404, "Task not found."),
        ],
        ..ROUTE
    },
    Route {
        method: Method::Put,
        path: "/tasks/{taskId}",
        summary: "Update Task",
        description: Some("Update an existing task by its ID."),
        params: &[path("taskId", "string")],
        body: body("TaskInput"),
        responses: &[
            returns(200, "Task updated successfully.", "Task"),
            response(404, "Task not found."),
        ],
        ..ROUTE
    },
    Route {
        method: Method::Delete,
        path: "/tasks/{taskId}",
        summary: "Delete Task",
        description: Some("Delete a task by its ID."),
        params: &[path("taskId", "string")],
        responses: &[
            response(204, "Task deleted successfully. No content returned."),
            response(404, "Task not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Auth,
        method: Method::Post,
        path: "/auth/login",
        summary: "User Login",
        description: Some(
            "Authenticate user credentials and initiate two-factor authentication if enabled.",
        ),
        body: body("LoginInput"),
        responses: &[
            returns(
                200,
                "Login successful. If 2FA is enabled for the account, a temporary token is returned along with a flag indicating that 2FA verification is required.",
                "LoginResponse",
            ),
            response(401, "Invalid credentials."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Auth,
        method: Method::Post,
        path: "/auth/verify",
        summary: "Verify Two-Factor Authentication Code",
        description: Some(
            "Verify the 2FA code using the temporary token obtained from the login endpoint. Upon successful verification, a JWT token is issued.",
        ),
        body: body("VerifyInput"),
        responses: &[
            returns(
                200,
                "2FA verified successfully; JWT token issued.",
                "VerifyResponse",
            ),
            response(401, "Invalid or expired 2FA code."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Auth,
        path: "/profile",
        summary: "Get User Profile",
        description: Some("Retrieve the profile of the authenticated user."),
        security: BEARER,
        responses: &[
            returns(200, "User profile retrieved successfully.", "Profile"),
            response(401, "Unauthorized \u{2013} invalid or missing JWT token."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        path: "/products",
        summary: "List Products",
        description: Some(
            "Retrieve a list of products available in the marketplace. Supports filtering by category and search query.",
        ),
        params: &[
            query("category", "string"),
            query("search", "string"),
            LIMIT,
            OFFSET,
        ],
        responses: &[returns(200, "A list of products.", "Product[]")],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        path: "/products/{productId}",
        summary: "Get Product Details",
        description: Some("Retrieve detailed information about a specific product."),
        params: &[path("productId", "string")],
        responses: &[
            returns(200, "Product details retrieved successfully.", "Product"),
            response(404, "Product not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        method: Method::Put,
        path: "/products/{productId}",
        summary: "Update Product",
        description: Some("Update product information. This endpoint is intended for vendor use."),
        params: &[path("productId", "string")],
        body: body("ProductInput"),
        responses: &[
            returns(200, "Product updated successfully.", "Product"),
            response(404, "Product not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        method: Method::Delete,
        path: "/products/{productId}",
        summary: "Delete Product",
        description: Some(
            "Delete a product from the marketplace. This action is restricted to vendors.",
        ),
        params: &[path("productId", "string")],
        responses: &[
            response(204, "Product deleted successfully."),
            response(404, "Product not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        path: "/orders",
        summary: "List Orders",
        description: Some("Retrieve a list of orders for the authenticated customer."),
        security: API_KEY,
        params: &[query("status", "string"), LIMIT, OFFSET],
        responses: &[returns(200, "A list of orders.", "Order[]")],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        method: Method::Post,
        path: "/orders",
        summary: "Create Order",
        description: Some("Place a new order in the marketplace."),
        security: API_KEY,
        body: body("OrderInput"),
        responses: &[returns(201, "Order created successfully.", "Order")],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        path: "/orders/{orderId}",
        summary: "Get Order Details",
        description: Some("Retrieve detailed information about a specific order."),
        security: API_KEY,
        params: &[path("orderId", "string")],
        responses: &[
            returns(200, "Order details retrieved successfully.", "Order"),
            response(404, "Order not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        method: Method::Put,
        path: "/orders/{orderId}",
        summary: "Update Order",
        description: Some("Update order status or details such as shipping information."),
        security: API_KEY,
        params: &[path("orderId", "string")],
        body: body("OrderUpdate"),
        responses: &[
            returns(200, "Order updated successfully.", "Order"),
            response(404, "Order not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Marketplace,
        method: Method::Delete,
        path: "/orders/{orderId}",
        summary: "Cancel Order",
        description: Some("Cancel an existing order."),
        security: API_KEY,
        params: &[path("orderId", "string")],
        responses: &[
            response(204, "Order canceled successfully."),
            response(404, "Order not found."),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Geojson,
        path: "/geometry",
        summary: "Get an array of GeoJSON Geometry objects",
        responses: &[
            returns(200, "Successful response", "GeometryCollection[]"),
            response(400, ""),
            response(401, ""),
            response(500, ""),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Geojson,
        method: Method::Post,
        path: "/geometry",
        summary: "Create new GeoJSON Geometry object",
        body: body("Geometry"),
        responses: &[
            response(201, "New GeoJSON Geometry object created"),
            response(400, ""),
            response(401, ""),
            response(403, ""),
            response(500, ""),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Put,
        path: "/pet",
        summary: "Update an existing pet",
        description: Some("Update an existing pet by Id"),
        security: PETSTORE_AUTH,
        body: body("Pet"),
        responses: &[
            returns(200, "Successful operation", "Pet"),
            response(400, "Invalid ID supplied"),
            response(404, "Pet not found"),
            response(422, "Validation exception"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/pet",
        summary: "Add a new pet to the store",
        description: Some("Add a new pet to the store"),
        security: PETSTORE_AUTH,
        body: body("Pet"),
        responses: &[
            returns(200, "Successful operation", "Pet"),
            response(400, "Invalid input"),
            response(422, "Validation exception"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/pet/findByStatus",
        summary: "Finds Pets by status",
        description: Some("Multiple status values can be provided with comma separated strings"),
        security: PETSTORE_AUTH,
        params: &[query("status", "available | pending | sold")],
        responses: &[
            returns(200, "successful operation", "Pet[]"),
            response(400, "Invalid status value"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/pet/findByTags",
        summary: "Finds Pets by tags",
        description: Some(
            "Multiple tags can be provided with comma separated strings. Use tag1, tag2, tag3 for testing.",
        ),
        security: PETSTORE_AUTH,
        params: &[query("tags", "string[]")],
        responses: &[
            returns(200, "successful operation", "Pet[]"),
            response(400, "Invalid tag value"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/pet/{petId}",
        summary: "Find pet by ID",
        description: Some("Returns a single pet"),
        security: &["api_key", "petstore_auth"],
        params: &[path("petId", "integer")],
        responses: &[
            returns(200, "successful operation", "Pet"),
            response(400, "Invalid ID supplied"),
            response(404, "Pet not found"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/pet/{petId}",
        summary: "Updates a pet in the store with form data",
        security: PETSTORE_AUTH,
        params: &[
            path("petId", "integer"),
            query("name", "string"),
            query("status", "string"),
        ],
        responses: &[response(400, "Invalid input")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Delete,
        path: "/pet/{petId}",
        summary: "Deletes a pet",
        description: Some("delete a pet"),
        security: PETSTORE_AUTH,
        params: &[header("api_key", "string"), path("petId", "integer")],
        responses: &[response(400, "Invalid pet value")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/pet/{petId}/uploadImage",
        summary: "uploads an image",
        security: PETSTORE_AUTH,
        params: &[
            path("petId", "integer"),
            query("additionalMetadata", "string"),
        ],
        body: optional_body("binary"),
        responses: &[returns(200, "successful operation", "ApiResponse")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/store/inventory",
        summary: "Returns pet inventories by status",
        description: Some("Returns a map of status codes to quantities"),
        security: &["api_key"],
        responses: &[returns(
            200,
            "successful operation",
            "map<string, integer>",
        )],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/store/order",
        summary: "Place an order for a pet",
        description: Some("Place a new order in the store"),
        body: optional_body("Order"),
        responses: &[
            returns(200, "successful operation", "Order"),
            response(400, "Invalid input"),
            response(422, "Validation exception"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/store/order/{orderId}",
        summary: "Find purchase order by ID",
        description: Some(
            "For valid response try integer IDs with value <= 5 or > 10. Other values will generate exceptions.",
        ),
        params: &[path("orderId", "integer")],
        responses: &[
            returns(200, "successful operation", "Order"),
            response(400, "Invalid ID supplied"),
            response(404, "Order not found"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Delete,
        path: "/store/order/{orderId}",
        summary: "Delete purchase order by ID",
        description: Some(
            "For valid response try integer IDs with value < 1000. Anything above 1000 or nonintegers will generate API errors",
        ),
        params: &[path("orderId", "integer")],
        responses: &[
            response(400, "Invalid ID supplied"),
            response(404, "Order not found"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/user",
        summary: "Create user",
        description: Some("This can only be done by the logged in user."),
        body: optional_body("User"),
        responses: &[otherwise_returns("successful operation", "User")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Post,
        path: "/user/createWithList",
        summary: "Creates list of users with given input array",
        description: Some("Creates list of users with given input array"),
        body: optional_body("User[]"),
        responses: &[
            returns(200, "Successful operation", "User"),
            otherwise("successful operation"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/user/login",
        summary: "Logs user into the system",
        params: &[query("username", "string"), query("password", "string")],
        responses: &[
            returns(200, "successful operation", "string"),
            response(400, "Invalid username/password supplied"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/user/logout",
        summary: "Logs out current logged in user session",
        responses: &[otherwise("successful operation")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        path: "/user/{username}",
        summary: "Get user by user name",
        params: &[path("username", "string")],
        responses: &[
            returns(200, "successful operation", "User"),
            response(400, "Invalid username supplied"),
            response(404, "User not found"),
        ],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Put,
        path: "/user/{username}",
        summary: "Update user",
        description: Some("This can only be done by the logged in user."),
        params: &[path("username", "string")],
        body: optional_body("User"),
        responses: &[otherwise("successful operation")],
        ..ROUTE
    },
    Route {
        group: Group::Petstore,
        method: Method::Delete,
        path: "/user/{username}",
        summary: "Delete user",
        description: Some("This can only be done by the logged in user."),
        params: &[path("username", "string")],
        responses: &[
            response(400, "Invalid username supplied"),
            response(404, "User not found"),
        ],
        ..ROUTE
    },
];

const GEOMETRY_TYPES: &str =
    "Point | MultiPoint | LineString | MultiLineString | Polygon | MultiPolygon | GeometryCollection";
const ELEMENT_TYPES: &str =
    "Point | MultiPoint | LineString | MultiLineString | Polygon | MultiPolygon";

/// Named request and response shapes referenced by [`ROUTES`].
pub static SCHEMAS: &[Schema] = &[
    Schema {
        group: Group::Tasks,
        name: "Task",
        fields: &[
            field("id", "string"),
            field("title", "string"),
            optional("description", "string"),
            field("completed", "boolean"),
        ],
    },
    Schema {
        group: Group::Tasks,
        name: "TaskInput",
        fields: &[
            field("title", "string"),
            optional("description", "string"),
            optional("completed", "boolean"),
        ],
    },
    Schema {
        group: Group::Auth,
        name: "LoginInput",
        fields: &[field("username", "string"), field("password", "string")],
    },
    Schema {
        group: Group::Auth,
        name: "LoginResponse",
        fields: &[
            field("two_factor_required", "boolean"),
            optional("temp_token", "string"),
            optional("message", "string"),
        ],
    },
    Schema {
        group: Group::Auth,
        name: "VerifyInput",
        fields: &[field("temp_token", "string"), field("code", "string")],
    },
    Schema {
        group: Group::Auth,
        name: "VerifyResponse",
        fields: &[field("token", "string"), field("expires_in", "integer")],
    },
    Schema {
        group: Group::Auth,
        name: "Profile",
        fields: &[
            field("id", "string"),
            field("username", "string"),
            field("fullName", "string"),
        ],
    },
    Schema {
        group: Group::Marketplace,
        name: "Product",
        fields: &[
            field("id", "string"),
            field("name", "string"),
            optional("description", "string"),
            field("price", "number"),
            field("category", "string"),
            optional("availability", "boolean"),
        ],
    },
    Schema {
        group: Group::Marketplace,
        name: "ProductInput",
        fields: &[
            field("name", "string"),
            optional("description", "string"),
            field("price", "number"),
            field("category", "string"),
            optional("availability", "boolean"),
        ],
    },
    Schema {
        group: Group::Marketplace,
        name: "Order",
        fields: &[
            field("id", "string"),
            field("customerId", "string"),
            field("orderDate", "date-time"),
            field("products", ORDER_LINES),
            field("totalAmount", "number"),
            field("status", "string"),
        ],
    },
    Schema {
        group: Group::Marketplace,
        name: "OrderInput",
        fields: &[field("customerId", "string"), field("products", ORDER_LINES)],
    },
    Schema {
        group: Group::Marketplace,
        name: "OrderUpdate",
        fields: &[field("status", "string")],
    },
    Schema {
        group: Group::Geojson,
        name: "Geometry",
        fields: &[field("type", GEOMETRY_TYPES), optional("bbox", "number[]")],
    },
    Schema {
        group: Group::Geojson,
        name: "GeometryElement",
        fields: &[field("type", ELEMENT_TYPES), optional("bbox", "number[]")],
    },
    Schema {
        group: Group::Geojson,
        name: "GeometryCollection",
        fields: &[
            field("type", GEOMETRY_TYPES),
            optional("bbox", "number[]"),
            field("geometries", "GeometryElement[]"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "Order",
        fields: &[
            optional("id", "integer"),
            optional("petId", "integer"),
            optional("quantity", "integer"),
            optional("shipDate", "date-time"),
            optional("status", "placed | approved | delivered"),
            optional("complete", "boolean"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "Address",
        fields: &[
            optional("street", "string"),
            optional("city", "string"),
            optional("state", "string"),
            optional("zip", "string"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "Customer",
        fields: &[
            optional("id", "integer"),
            optional("username", "string"),
            optional("address", "Address[]"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "Category",
        fields: &[optional("id", "integer"), optional("name", "string")],
    },
    Schema {
        group: Group::Petstore,
        name: "User",
        fields: &[
            optional("id", "integer"),
            optional("username", "string"),
            optional("firstName", "string"),
            optional("lastName", "string"),
            optional("email", "string"),
            optional("password", "string"),
            optional("phone", "string"),
            optional("userStatus", "integer"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "Tag",
        fields: &[optional("id", "integer"), optional("name", "string")],
    },
    Schema {
        group: Group::Petstore,
        name: "Pet",
        fields: &[
            optional("id", "integer"),
            field("name", "string"),
            optional("category", "Category"),
            field("photoUrls", "string[]"),
            optional("tags", "Tag[]"),
            optional("status", "available | pending | sold"),
        ],
    },
    Schema {
        group: Group::Petstore,
        name: "ApiResponse",
        fields: &[
            optional("code", "integer"),
            optional("type", "string"),
            optional("message", "string"),
        ],
    },
];

/// Looks up a route by method and path template (`/tasks/{taskId}`).
pub fn find(method: Method, path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.method == method && r.path == path)
}

/// Resolves a schema reference (`"Pet"`, `"Task[]"`) within `group`.
/// Primitive references such as `"string"` have no named schema.
pub fn schema(group: Group, reference: &str) -> Option<&'static Schema> {
    let name = reference.trim_end_matches("[]");
    SCHEMAS.iter().find(|s| s.group == group && s.name == name)
}

/// Status and JSON body handed back to the hosting framework.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    fn new(status: u16, body: Option<Value>) -> Self {
        Reply { status, body }
    }
}

/// `POST /geometry`: `201` for any valid geometry, `400` otherwise.
pub fn post_geometry(body: &[u8]) -> Reply {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            debug!("rejecting unparsable geometry body: {}", err);
            let errors = vec![JSONError::malformed(&err)];
            return Reply::new(400, Some(json!({ "errors": errors })));
        }
    };
    match Validator::new().collect_all().geometry(&value) {
        Ok(geometry) => {
            debug!("accepted {} geometry", geometry.kind());
            Reply::new(201, None)
        }
        Err(errors) => {
            debug!("rejecting geometry: {}", errors);
            let errors: Vec<JSONError> = errors.iter().map(JSONError::from).collect();
            Reply::new(400, Some(json!({ "errors": errors })))
        }
    }
}

/// `GET /geometry`: `200` with the array of geometry collections.
pub fn get_geometry(collections: &[Geometry]) -> Reply {
    if collections
        .iter()
        .any(|g| g.kind() != GeoJsonType::GeometryCollection)
    {
        return Reply::new(500, None);
    }
    match serde_json::to_value(collections) {
        Ok(body) => Reply::new(200, Some(body)),
        Err(_) => Reply::new(500, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_covers_every_group() {
        for group in &[
            Group::Tasks,
            Group::Auth,
            Group::Marketplace,
            Group::Geojson,
            Group::Petstore,
        ] {
            assert!(ROUTES.iter().any(|r| r.group == *group));
        }
        assert_eq!(ROUTES.len(), 38);
    }

    #[test]
    fn routes_are_unique() {
        for (idx, route) in ROUTES.iter().enumerate() {
            let duplicate = ROUTES[idx + 1..]
                .iter()
                .any(|r| r.method == route.method && r.path == route.path);
            assert!(!duplicate, "{:?} {} declared twice", route.method, route.path);
        }
    }

    #[test]
    fn find_route() {
        let route = find(Method::Delete, "/tasks/{taskId}").unwrap();
        assert!(route.declares(204));
        assert!(route.declares(404));
        assert!(!route.declares(200));
        assert!(find(Method::Put, "/tasks").is_none());
    }

    #[test]
    fn descriptions_match_declarations() {
        let route = find(Method::Get, "/tasks").unwrap();
        assert_eq!(route.responses[0].description, "A JSON array of task objects.");
        assert_eq!(route.responses[0].schema, Some("Task[]"));

        let route = find(Method::Get, "/tasks/{taskId}").unwrap();
        assert_eq!(
            route.responses[0].description,
            "Task details retrieved successfully."
        );

        let route = find(Method::Post, "/auth/verify").unwrap();
        assert_eq!(
            route.responses[0].description,
            "2FA verified successfully; JWT token issued."
        );

        let route = find(Method::Get, "/profile").unwrap();
        assert_eq!(route.security, &["bearerAuth"]);
        assert_eq!(
            route.responses[1].description,
            "Unauthorized \u{2013} invalid or missing JWT token."
        );

        let route = find(Method::Get, "/orders/{orderId}").unwrap();
        assert_eq!(
            route.responses[0].description,
            "Order details retrieved successfully."
        );
    }

    #[test]
    fn path_params_match_template() {
        for route in ROUTES {
            let declared: Vec<_> = route
                .params
                .iter()
                .filter(|p| p.location == Location::Path)
                .map(|p| format!("{{{}}}", p.name))
                .collect();
            let in_template = route.path.matches('{').count();
            assert_eq!(declared.len(), in_template, "{}", route.path);
            for param in declared {
                assert!(route.path.contains(&param), "{} {}", route.path, param);
            }
        }
    }

    #[test]
    fn schema_references_resolve() {
        let primitives = ["string", "binary", "map<string, integer>"];
        for route in ROUTES {
            for reference in route.schema_refs() {
                if primitives.contains(&reference) {
                    continue;
                }
                assert!(
                    schema(route.group, reference).is_some(),
                    "{} {} references unknown {}",
                    route.summary,
                    route.path,
                    reference
                );
            }
        }
    }

    #[test]
    fn request_shapes() {
        let route = find(Method::Put, "/tasks/{taskId}").unwrap();
        let body = route.body.unwrap();
        assert!(body.required);
        let input = schema(Group::Tasks, body.schema).unwrap();
        let required: Vec<_> = input
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["title"]);

        let route = find(Method::Get, "/products").unwrap();
        let names: Vec<_> = route.params.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["category", "search", "limit", "offset"]);
        assert!(route.params.iter().all(|p| !p.required));

        let store = schema(Group::Petstore, "Order").unwrap();
        let market = schema(Group::Marketplace, "Order").unwrap();
        assert!(store.fields.iter().all(|f| !f.required));
        assert!(market.fields.iter().all(|f| f.required));

        let post = find(Method::Post, "/geometry").unwrap();
        assert_eq!(post.body.unwrap().schema, "Geometry");
    }

    #[test]
    fn route_json_shape() {
        let route = find(Method::Delete, "/pet/{petId}").unwrap();
        let value = serde_json::to_value(route).unwrap();
        assert_eq!(value["method"], "DELETE");
        assert_eq!(value["group"], "petstore");
        assert_eq!(
            value["params"][0],
            json!({"name": "api_key", "in": "header", "kind": "string", "required": false})
        );
        assert_eq!(value.get("body"), None);

        let route = find(Method::Get, "/user/logout").unwrap();
        let value = serde_json::to_value(route).unwrap();
        assert_eq!(value.get("params"), None);
        assert_eq!(
            value["responses"][0],
            json!({"status": null, "description": "successful operation"})
        );
    }

    #[test]
    fn default_responses_have_no_status() {
        let route = find(Method::Get, "/user/logout").unwrap();
        assert_eq!(route.statuses().count(), 0);
        assert_eq!(route.responses.len(), 1);
    }

    #[test]
    fn post_geometry_created() {
        let reply = post_geometry(br#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        assert_eq!(reply, Reply::new(201, None));
        assert!(find(Method::Post, "/geometry").unwrap().declares(reply.status));
    }

    #[test]
    fn post_geometry_rejects_invalid_geometry() {
        let reply = post_geometry(br#"{"type": "Point", "coordinates": [[1.0, 2.0]]}"#);
        assert_eq!(reply.status, 400);
        let body = reply.body.unwrap();
        assert_eq!(body["errors"][0]["kind"], "shape mismatch");
        assert_eq!(body["errors"][0]["path"], "/coordinates");
    }

    #[test]
    fn post_geometry_rejects_features_and_garbage() {
        let reply = post_geometry(br#"{"type": "Feature", "geometry": null, "properties": {}}"#);
        assert_eq!(reply.status, 400);
        let reply = post_geometry(b"{not json");
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn get_geometry_lists_collections() {
        let collection = Geometry::GeometryCollection {
            geometries: vec![Geometry::Point {
                coordinates: (1., 2.).into(),
                bbox: None,
            }],
            bbox: None,
        };
        let reply = get_geometry(&[collection]);
        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(body[0]["type"], "GeometryCollection");
        assert_eq!(body[0]["geometries"][0]["coordinates"], json!([1.0, 2.0]));

        let point = Geometry::Point {
            coordinates: (1., 2.).into(),
            bbox: None,
        };
        assert_eq!(get_geometry(&[point]).status, 500);
    }
}
