use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use looq_core::{GarmentPrediction, OutfitRecommendation, Product, ScoredProduct};
use looq_styling::{suggest_looks, LookSuggestion};
use looq_vision::decode_image;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::read_image;

pub const SERVICE_NAME: &str = "looq-api";

#[derive(Serialize)]
struct RecognitionResponse {
    prediction: GarmentPrediction,
    similar_products: Vec<ScoredProduct>,
    outfits: Vec<LookSuggestion>,
}

#[derive(Deserialize)]
struct GenerateOutfitsRequest {
    anchor_item: Product,
    prediction: GarmentPrediction,
    #[serde(default)]
    available_products: Vec<Product>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct CompleteAnalysisResponse {
    prediction: GarmentPrediction,
    products: Vec<Product>,
    outfits: Vec<OutfitRecommendation>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState) -> std::io::Result<()> {
        let bind = (state.settings.host.clone(), state.settings.port);
        info!("Starting HTTP server on {}:{}", bind.0, bind.1);

        HttpServer::new(move || {
            App::new()
                .wrap(cors(&state))
                .wrap(middleware::Logger::default())
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(bind)?
        .run()
        .await
    }
}

fn cors(state: &AppState) -> Cors {
    let settings = &state.settings;
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if settings.allows_any_origin() {
        return cors.allow_any_origin();
    }
    settings
        .cors_origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}

/// Register every route; shared by the server and handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api/v1")
                .route("/recognition/analyze", web::post().to(analyze_image))
                .route("/products/search", web::post().to(search_products))
                .route("/products/{provider}/{id}", web::get().to(get_provider_product))
                .route("/outfits/generate", web::post().to(generate_outfits))
                .route(
                    "/outfits/suggestions/{category}",
                    web::get().to(outfit_suggestions),
                )
                .route("/complete/analyze", web::post().to(complete_analysis))
                .route("/catalog/products", web::put().to(catalog::upsert_products))
                .route("/catalog/products/{id}", web::get().to(catalog::get_product))
                .route("/catalog/products/{id}", web::delete().to(catalog::delete_product))
                .route(
                    "/catalog/products/{id}/image",
                    web::post().to(catalog::index_product_image),
                )
                .route("/catalog/search", web::post().to(catalog::search_catalog))
                .route("/visual-search", web::post().to(catalog::visual_search)),
        );
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "LOOQ API - Fashion Recognition & Shopping",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "catalog_products": state.catalog().count(),
        "providers": state.aggregator.provider_names(),
    }))
}

async fn recognize_upload(
    state: &AppState,
    payload: Multipart,
) -> ApiResult<looq_vision::Recognition> {
    let bytes = read_image(payload, &state.settings).await?;
    let recognizer = state.recognizer.clone();
    let recognition = web::block(move || {
        let image = decode_image(&bytes)?;
        recognizer.recognize(&image)
    })
    .await??;
    Ok(recognition)
}

async fn analyze_image(
    state: web::Data<AppState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let recognition = recognize_upload(&state, payload).await?;
    let outfits = suggest_looks(recognition.prediction.category.as_str());

    Ok(HttpResponse::Ok().json(RecognitionResponse {
        prediction: recognition.prediction,
        similar_products: recognition.similar_products,
        outfits,
    }))
}

async fn search_products(
    state: web::Data<AppState>,
    prediction: web::Json<GarmentPrediction>,
) -> ApiResult<HttpResponse> {
    let prediction = prediction.into_inner();
    if !prediction.category.is_top() {
        return Err(ApiError::BadRequest(format!(
            "Category {} is not supported yet. Only tops are supported.",
            prediction.category
        )));
    }

    let products = state
        .aggregator
        .search_products(&prediction, state.settings.similar_products_limit)
        .await;
    info!(
        "Found {} products for category {}",
        products.len(),
        prediction.category
    );
    Ok(HttpResponse::Ok().json(products))
}

async fn get_provider_product(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (provider, id) = path.into_inner();
    let product = state.aggregator.get_product(&provider, &id).await?;
    Ok(HttpResponse::Ok().json(product))
}

async fn generate_outfits(
    state: web::Data<AppState>,
    req: web::Json<GenerateOutfitsRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let limit = req.limit.unwrap_or(state.settings.max_outfits_per_item);
    let outfits = state.outfits.generate_outfits(
        &req.anchor_item,
        &req.prediction,
        &req.available_products,
        limit,
    );
    Ok(HttpResponse::Ok().json(outfits))
}

async fn outfit_suggestions(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(suggest_looks(&path.into_inner()))
}

/// Recognize, search providers and build outfits in one call
async fn complete_analysis(
    state: web::Data<AppState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let recognition = recognize_upload(&state, payload).await?;
    let prediction = recognition.prediction;

    let products = state
        .aggregator
        .search_products(&prediction, state.settings.similar_products_limit)
        .await;
    info!("Found {} products", products.len());

    let outfits = match products.first() {
        Some(anchor) => {
            let mut pool = products.clone();
            pool.extend(state.catalog().products());
            let outfits = state.outfits.generate_outfits(
                anchor,
                &prediction,
                &pool,
                state.settings.max_outfits_per_item,
            );
            info!("Generated {} outfits", outfits.len());
            outfits
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(CompleteAnalysisResponse {
        prediction,
        products,
        outfits,
    }))
}
