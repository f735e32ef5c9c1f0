//! Catalog management and similarity search handlers.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use looq_core::{Filter, FilterCondition, GarmentCategory, Product, ProductFilter, ProductId};
use looq_vision::decode_image;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::read_image;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Deserialize)]
pub(crate) struct UpsertProductsRequest {
    products: Vec<Product>,
}

#[derive(Deserialize)]
pub(crate) struct CatalogSearchRequest {
    vector: Vec<f32>,
    limit: Option<usize>,
    category: Option<String>,
    provider: Option<String>,
    max_price: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct VisualSearchQuery {
    category: Option<String>,
    limit: Option<usize>,
}

fn parse_id(raw: &str) -> ApiResult<ProductId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid product id: {}", raw)))
}

fn parse_category(raw: Option<&str>) -> ApiResult<Option<GarmentCategory>> {
    raw.map(str::parse::<GarmentCategory>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub(crate) async fn upsert_products(
    state: web::Data<AppState>,
    req: web::Json<UpsertProductsRequest>,
) -> ApiResult<HttpResponse> {
    let products = req.into_inner().products;
    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();

    let upserted = state.catalog().upsert_many(products)?;
    state.catalog_changed();
    info!("Upserted {} catalog products", upserted);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": {
            "upserted": upserted,
            "ids": ids,
        }
    })))
}

pub(crate) async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    state
        .catalog()
        .get(&id)
        .map(|product| HttpResponse::Ok().json(product))
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))
}

pub(crate) async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    if !state.catalog().delete(&id) {
        return Err(ApiError::NotFound(format!("Product not found: {}", id)));
    }
    state.catalog_changed();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true })))
}

/// Embed an uploaded product photo and attach it to the catalog entry
pub(crate) async fn index_product_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner())?;
    if state.catalog().get(&id).is_none() {
        return Err(ApiError::NotFound(format!("Product not found: {}", id)));
    }

    let bytes = read_image(payload, &state.settings).await?;
    let search = state.visual_search().clone();
    web::block(move || {
        let image = decode_image(&bytes)?;
        search.index_product(&id, Some(&image), None)
    })
    .await??;
    state.catalog_changed();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": true,
        "id": id,
    })))
}

pub(crate) async fn search_catalog(
    state: web::Data<AppState>,
    req: web::Json<CatalogSearchRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();

    let mut conditions = Vec::new();
    if let Some(category) = parse_category(req.category.as_deref())? {
        conditions.push(FilterCondition::Category(category));
    }
    if let Some(provider) = req.provider {
        conditions.push(FilterCondition::Provider(provider));
    }
    if let Some(max_price) = req.max_price {
        conditions.push(FilterCondition::MaxPrice(max_price));
    }
    let filter = ProductFilter::all(conditions);

    let results = state.catalog().search(
        &req.vector,
        req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        filter.as_ref().map(|f| f as &dyn Filter),
    )?;
    Ok(HttpResponse::Ok().json(results))
}

pub(crate) async fn visual_search(
    state: web::Data<AppState>,
    query: web::Query<VisualSearchQuery>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let category = parse_category(query.category.as_deref())?;
    let limit = query.limit.unwrap_or(state.settings.similar_products_limit);

    let bytes = read_image(payload, &state.settings).await?;
    let search = state.visual_search().clone();
    let results = web::block(move || {
        let image = decode_image(&bytes)?;
        search.find_similar(&image, category, limit)
    })
    .await??;

    Ok(HttpResponse::Ok().json(results))
}
