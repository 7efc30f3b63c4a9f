//! REST API for the configuration service.
//!
//! Exposes the session's configuration store to the front end: one endpoint
//! per editable field, plus the derived fit report, confidence score,
//! preview scene and export document. Uses Axum and supports CORS.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, ExportConfig, PreviewConfig};
use crate::error::Error;
use crate::export::{self, ExportSnapshot};
use crate::geometry::{Clearance, FitReport, FitVerdict};
use crate::model::{
    BoxType, Configuration, Flute, PackagingKind, PackagingMaterial, PackagingSettings, Product,
    ProductMaterial, ShippingBox, TestCategory, TestResults,
};
use crate::preview::{self, PreviewScene, PrismMesh};
use crate::store::ConfigurationStore;
use crate::types::Axis;

/// Shared handler state: the session's store plus presentation settings.
#[derive(Clone)]
pub struct ApiState {
    store: Arc<Mutex<ConfigurationStore>>,
    export: ExportConfig,
    preview: PreviewConfig,
}

impl ApiState {
    pub fn new(store: ConfigurationStore, export: ExportConfig, preview: PreviewConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            export,
            preview,
        }
    }

    // Setters validate before assigning, so a poisoned store is still consistent.
    fn store(&self) -> MutexGuard<'_, ConfigurationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>VirtuPack API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "name": "Chair Arm" }))]
pub struct NameRequest {
    pub name: String,
}

/// Millimetre value for a dimension or the wall thickness.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "value": 120.0 }))]
pub struct MillimetreRequest {
    pub value: f64,
}

/// Integer value for fragility, packaging parameters and test scores.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "value": 90 }))]
pub struct IntegerRequest {
    pub value: i64,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "materials": ["Plastic", "Metal"] }))]
pub struct MaterialsRequest {
    pub materials: Vec<ProductMaterial>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "type": "FEFCO 0300" }))]
pub struct BoxTypeRequest {
    #[serde(rename = "type")]
    pub box_type: BoxType,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "type": "AirPillow" }))]
pub struct PackagingTypeRequest {
    #[serde(rename = "type")]
    pub kind: PackagingKind,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "flute": "B" }))]
pub struct FluteRequest {
    pub flute: Flute,
}

/// Current session state with the resolved packaging material.
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub configuration: Configuration,
    pub active_material: PackagingMaterial,
    pub confidence_score: f64,
}

/// Packaging settings plus the variant downstream readers should use.
#[derive(Serialize, ToSchema)]
pub struct PackagingResponse {
    pub settings: PackagingSettings,
    pub active: PackagingMaterial,
}

impl PackagingResponse {
    fn from_settings(settings: &PackagingSettings) -> Self {
        Self {
            settings: settings.clone(),
            active: settings.active(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TestsResponse {
    pub results: TestResults,
    pub confidence_score: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ConfidenceResponse {
    pub confidence_score: f64,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    code: String,
    details: String,
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    code: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    let body = ErrorResponse {
        error: error.into(),
        code: code.into(),
        details: details.into(),
    };
    (status, Json(body)).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        "INVALID_JSON",
        err.body_text(),
    )
}

fn domain_error(err: Error) -> Response {
    match err {
        Error::InvalidGeometry(_) => {
            error!(error = %err, "geometry contract violated");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid geometry",
                err.code(),
                err.to_string(),
            )
        }
        _ => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input data",
            err.code(),
            err.to_string(),
        ),
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(value)| value)
        .map_err(json_deserialize_error)
}

fn ok_json<T: Serialize>(value: T) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

fn respond<T: Serialize>(result: Result<T, Error>) -> Response {
    match result {
        Ok(value) => ok_json(value),
        Err(err) => domain_error(err),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handle_get_configuration,
        handle_product_name,
        handle_product_dimension,
        handle_fragility,
        handle_materials,
        handle_box_type,
        handle_box_dimension,
        handle_wall_thickness,
        handle_packaging_type,
        handle_paper_gsm,
        handle_air_pillows,
        handle_foam_fill,
        handle_flute,
        handle_test_score,
        handle_fit,
        handle_confidence,
        handle_preview,
        handle_export,
        handle_import
    ),
    components(
        schemas(
            NameRequest,
            MillimetreRequest,
            IntegerRequest,
            MaterialsRequest,
            BoxTypeRequest,
            PackagingTypeRequest,
            FluteRequest,
            SessionResponse,
            PackagingResponse,
            TestsResponse,
            ConfidenceResponse,
            ErrorResponse,
            Configuration,
            Product,
            ShippingBox,
            PackagingSettings,
            PackagingMaterial,
            TestResults,
            FitReport,
            FitVerdict,
            Clearance,
            PreviewScene,
            PrismMesh,
            ExportSnapshot,
            Axis,
            TestCategory
        )
    ),
    tags(
        (name = "configuration", description = "Editing the packaging configuration"),
        (name = "analysis", description = "Derived fit, score and preview data"),
        (name = "export", description = "Export document download and import")
    )
)]
struct ApiDoc;

/// Builds the router with all endpoints.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/configuration", get(handle_get_configuration))
        .route("/product/name", put(handle_product_name))
        .route("/product/dimensions/{axis}", put(handle_product_dimension))
        .route("/product/fragility", put(handle_fragility))
        .route("/product/materials", put(handle_materials))
        .route("/box/type", put(handle_box_type))
        .route("/box/dimensions/{axis}", put(handle_box_dimension))
        .route("/box/wall_thickness", put(handle_wall_thickness))
        .route("/packaging/type", put(handle_packaging_type))
        .route("/packaging/paper_gsm", put(handle_paper_gsm))
        .route("/packaging/air_pillows", put(handle_air_pillows))
        .route("/packaging/foam_fill_pct", put(handle_foam_fill))
        .route("/packaging/flute", put(handle_flute))
        .route("/tests/{category}", put(handle_test_score))
        .route("/fit", get(handle_fit))
        .route("/confidence", get(handle_confidence))
        .route("/preview", get(handle_preview))
        .route("/export", get(handle_export))
        .route("/import", post(handle_import))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server and blocks until it terminates.
pub async fn start_api_server(config: ApiConfig, state: ApiState) -> std::io::Result<()> {
    let app = router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "🚀 Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        info!("💡 Local access: http://localhost:{}", config.port());
    }
    info!("📑 Documentation: GET /docs, GET /docs/openapi.json");
    info!("📤 Export: GET /export, POST /import");

    axum::serve(listener, app).await
}

#[utoipa::path(
    get,
    path = "/configuration",
    responses((status = 200, description = "Current configuration", body = SessionResponse)),
    tag = "configuration"
)]
async fn handle_get_configuration(State(state): State<ApiState>) -> Response {
    let store = state.store();
    ok_json(SessionResponse {
        configuration: store.configuration().clone(),
        active_material: store.active_material(),
        confidence_score: store.confidence(),
    })
}

#[utoipa::path(
    put,
    path = "/product/name",
    request_body = NameRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_product_name(
    State(state): State<ApiState>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    ok_json(state.store().set_product_name(request.name))
}

#[utoipa::path(
    put,
    path = "/product/dimensions/{axis}",
    params(("axis" = String, Path, description = "length, width or height")),
    request_body = MillimetreRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [10, 500] mm or unknown axis", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_product_dimension(
    State(state): State<ApiState>,
    Path(axis): Path<String>,
    payload: Result<Json<MillimetreRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let axis = match axis.parse::<Axis>() {
        Ok(axis) => axis,
        Err(err) => return domain_error(err),
    };
    respond(state.store().set_product_dimension(axis, request.value))
}

#[utoipa::path(
    put,
    path = "/product/fragility",
    request_body = IntegerRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [0, 100]", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_fragility(
    State(state): State<ApiState>,
    payload: Result<Json<IntegerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(state.store().set_fragility(request.value))
}

#[utoipa::path(
    put,
    path = "/product/materials",
    request_body = MaterialsRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown material", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_materials(
    State(state): State<ApiState>,
    payload: Result<Json<MaterialsRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    ok_json(state.store().set_materials(request.materials))
}

#[utoipa::path(
    put,
    path = "/box/type",
    request_body = BoxTypeRequest,
    responses(
        (status = 200, description = "Updated box", body = ShippingBox),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown box type", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_box_type(
    State(state): State<ApiState>,
    payload: Result<Json<BoxTypeRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    ok_json(state.store().set_box_type(request.box_type))
}

#[utoipa::path(
    put,
    path = "/box/dimensions/{axis}",
    params(("axis" = String, Path, description = "length, width or height")),
    request_body = MillimetreRequest,
    responses(
        (status = 200, description = "Updated box", body = ShippingBox),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [100, 1000] mm or unknown axis", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_box_dimension(
    State(state): State<ApiState>,
    Path(axis): Path<String>,
    payload: Result<Json<MillimetreRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let axis = match axis.parse::<Axis>() {
        Ok(axis) => axis,
        Err(err) => return domain_error(err),
    };
    respond(state.store().set_box_dimension(axis, request.value))
}

#[utoipa::path(
    put,
    path = "/box/wall_thickness",
    request_body = MillimetreRequest,
    responses(
        (status = 200, description = "Updated box", body = ShippingBox),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [1.0, 10.0] mm", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_wall_thickness(
    State(state): State<ApiState>,
    payload: Result<Json<MillimetreRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(state.store().set_wall_thickness(request.value))
}

#[utoipa::path(
    put,
    path = "/packaging/type",
    request_body = PackagingTypeRequest,
    responses(
        (status = 200, description = "Packaging with the newly active material", body = PackagingResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown packaging type", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_packaging_type(
    State(state): State<ApiState>,
    payload: Result<Json<PackagingTypeRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let mut store = state.store();
    store.set_material_type(request.kind);
    ok_json(PackagingResponse::from_settings(store.packaging()))
}

#[utoipa::path(
    put,
    path = "/packaging/paper_gsm",
    request_body = IntegerRequest,
    responses(
        (status = 200, description = "Updated packaging", body = PackagingResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [20, 200]", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_paper_gsm(
    State(state): State<ApiState>,
    payload: Result<Json<IntegerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(
        state
            .store()
            .set_paper_gsm(request.value)
            .map(PackagingResponse::from_settings),
    )
}

#[utoipa::path(
    put,
    path = "/packaging/air_pillows",
    request_body = IntegerRequest,
    responses(
        (status = 200, description = "Updated packaging", body = PackagingResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [1, 20]", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_air_pillows(
    State(state): State<ApiState>,
    payload: Result<Json<IntegerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(
        state
            .store()
            .set_air_pillows(request.value)
            .map(PackagingResponse::from_settings),
    )
}

#[utoipa::path(
    put,
    path = "/packaging/foam_fill_pct",
    request_body = IntegerRequest,
    responses(
        (status = 200, description = "Updated packaging", body = PackagingResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Value outside [0, 100]", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_foam_fill(
    State(state): State<ApiState>,
    payload: Result<Json<IntegerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(
        state
            .store()
            .set_foam_fill(request.value)
            .map(PackagingResponse::from_settings),
    )
}

#[utoipa::path(
    put,
    path = "/packaging/flute",
    request_body = FluteRequest,
    responses(
        (status = 200, description = "Updated packaging", body = PackagingResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown flute", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_flute(
    State(state): State<ApiState>,
    payload: Result<Json<FluteRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    ok_json(PackagingResponse::from_settings(
        state.store().set_flute(request.flute),
    ))
}

#[utoipa::path(
    put,
    path = "/tests/{category}",
    params(("category" = String, Path, description = "drop, vibration or compression")),
    request_body = IntegerRequest,
    responses(
        (status = 200, description = "Updated test results", body = TestsResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Score outside [0, 100] or unknown category", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_test_score(
    State(state): State<ApiState>,
    Path(category): Path<String>,
    payload: Result<Json<IntegerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let category = match category.parse::<TestCategory>() {
        Ok(category) => category,
        Err(err) => return domain_error(err),
    };
    let mut store = state.store();
    if let Err(err) = store.set_test_score(category, request.value) {
        return domain_error(err);
    }
    ok_json(TestsResponse {
        results: *store.test_results(),
        confidence_score: store.confidence(),
    })
}

#[utoipa::path(
    get,
    path = "/fit",
    responses(
        (status = 200, description = "Dimension-only fit check", body = FitReport),
        (status = INTERNAL_SERVER_ERROR, description = "Stored geometry is invalid", body = ErrorResponse)
    ),
    tag = "analysis"
)]
async fn handle_fit(State(state): State<ApiState>) -> Response {
    respond(state.store().fit_report())
}

#[utoipa::path(
    get,
    path = "/confidence",
    responses((status = 200, description = "Aggregate confidence score", body = ConfidenceResponse)),
    tag = "analysis"
)]
async fn handle_confidence(State(state): State<ApiState>) -> Response {
    ok_json(ConfidenceResponse {
        confidence_score: state.store().confidence(),
    })
}

#[utoipa::path(
    get,
    path = "/preview",
    responses(
        (status = 200, description = "Box and product prisms for the 3D preview", body = PreviewScene),
        (status = INTERNAL_SERVER_ERROR, description = "Stored geometry is invalid", body = ErrorResponse)
    ),
    tag = "analysis"
)]
async fn handle_preview(State(state): State<ApiState>) -> Response {
    let config = state.store().configuration().clone();
    respond(preview::build_scene(
        &config,
        state.preview.product_inset(),
    ))
}

#[utoipa::path(
    get,
    path = "/export",
    responses((
        status = 200,
        description = "Export document as a file download",
        content_type = "application/json",
        body = ExportSnapshot
    )),
    tag = "export"
)]
async fn handle_export(State(state): State<ApiState>) -> Response {
    let document = state.store().serialize();
    let file_name = state.export.file_name();
    info!(file_name, bytes = document.len(), "📤 Export generated");

    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/import",
    request_body(content = ExportSnapshot, content_type = "application/json"),
    responses(
        (status = 200, description = "Configuration loaded from the document", body = SessionResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed document or value out of range", body = ErrorResponse)
    ),
    tag = "export"
)]
async fn handle_import(State(state): State<ApiState>, body: String) -> Response {
    let config = match export::parse(&body) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "📥 Import rejected");
            return domain_error(err);
        }
    };

    let mut store = state.store();
    store.replace(config);
    info!(product = %store.product().name, "📥 Configuration imported");
    ok_json(SessionResponse {
        configuration: store.configuration().clone(),
        active_material: store.active_material(),
        confidence_score: store.confidence(),
    })
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn test_state() -> ApiState {
        crate::logging::init_test();
        ApiState::new(
            ConfigurationStore::new(),
            ExportConfig::default(),
            PreviewConfig::default(),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in [
            "/configuration",
            "/product/dimensions/{axis}",
            "/box/wall_thickness",
            "/packaging/type",
            "/tests/{category}",
            "/fit",
            "/preview",
            "/export",
            "/import",
        ] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        for name in ["ExportSnapshot", "FitReport", "ErrorResponse", "Configuration"] {
            assert!(
                components.schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[tokio::test]
    async fn product_dimension_update_is_applied() {
        let state = test_state();
        let response = handle_product_dimension(
            State(state.clone()),
            Path("width".to_string()),
            Ok(Json(MillimetreRequest { value: 120.0 })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["width"], 120.0);
        assert_eq!(state.store().product().width, 120.0);
    }

    #[tokio::test]
    async fn unknown_axis_is_rejected() {
        let state = test_state();
        let response = handle_box_dimension(
            State(state.clone()),
            Path("depth".to_string()),
            Ok(Json(MillimetreRequest { value: 200.0 })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "UNKNOWN_NAME");
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected_and_store_unchanged() {
        let state = test_state();
        let response = handle_test_score(
            State(state.clone()),
            Path("drop".to_string()),
            Ok(Json(IntegerRequest { value: 150 })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "RANGE_ERROR");
        assert_eq!(state.store().test_results().drop, 94);
    }

    #[tokio::test]
    async fn score_update_returns_new_confidence() {
        let state = test_state();
        let response = handle_test_score(
            State(state.clone()),
            Path("vibration".to_string()),
            Ok(Json(IntegerRequest { value: 100 })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["results"]["vibration"], 100);
        assert_eq!(body["confidence_score"], 94.67);
    }

    #[tokio::test]
    async fn packaging_type_switch_reports_retained_parameter() {
        let state = test_state();
        handle_paper_gsm(State(state.clone()), Ok(Json(IntegerRequest { value: 150 }))).await;
        handle_packaging_type(
            State(state.clone()),
            Ok(Json(PackagingTypeRequest {
                kind: PackagingKind::AirPillow,
            })),
        )
        .await;

        let response = handle_packaging_type(
            State(state.clone()),
            Ok(Json(PackagingTypeRequest {
                kind: PackagingKind::PaperWrap,
            })),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["active"], json!({ "type": "PaperWrap", "gsm": 150 }));
    }

    #[tokio::test]
    async fn fit_endpoint_reports_overflow_axes() {
        let state = test_state();
        state
            .store()
            .set_product_dimension(Axis::Height, 151.0)
            .unwrap();

        let response = handle_fit(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["verdict"],
            json!({ "status": "overflow", "axes": ["height"] })
        );
    }

    #[tokio::test]
    async fn export_is_served_as_attachment() {
        let state = test_state();
        let response = handle_export(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert_eq!(
            disposition.as_deref(),
            Some("attachment; filename=\"virtupack_simulation.json\"")
        );
        let body = body_json(response).await;
        assert_eq!(body["tests"]["confidence_score"], 88.67);
        assert_eq!(body["product"]["dimensions_mm"], json!([100, 80, 50]));
    }

    #[tokio::test]
    async fn import_replaces_configuration() {
        let state = test_state();
        let mut source = ConfigurationStore::new();
        source.set_product_name("Imported Lamp");
        source.set_test_score(TestCategory::Compression, 60).unwrap();

        let response = handle_import(State(state.clone()), source.serialize()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.store().configuration(), source.configuration());
    }

    #[tokio::test]
    async fn invalid_import_keeps_current_configuration() {
        let state = test_state();
        let mut doc: Value = serde_json::from_str(&state.store().serialize()).unwrap();
        doc["product"]["name"] = json!("Should Not Land");
        doc["tests"]["drop"] = json!(150);

        let response = handle_import(State(state.clone()), doc.to_string()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.store().product().name, "Chair Arm");

        let response = handle_import(State(state.clone()), "{".to_string()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "INVALID_DOCUMENT");
    }

    #[tokio::test]
    async fn preview_uses_configured_inset() {
        let state = test_state();
        let response = handle_preview(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["product"]["x"][0], 50.0);
        assert_eq!(body["product"]["z"][0], 10.0);
        assert_eq!(body["drawn_inside"], true);
    }
}
