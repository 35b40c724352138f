use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::cart::{format_decimal, CartLine};
use crate::domain::catalog::{BundleItem, Category, Product};
use crate::errors::AppError;
use crate::state::AppState;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BundleItemResponse {
    pub name: String,
    pub quantity: Option<String>,
    pub origin: Option<String>,
}

impl From<BundleItem> for BundleItemResponse {
    fn from(item: BundleItem) -> Self {
        Self {
            name: item.name,
            quantity: item.quantity,
            origin: item.origin,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string, e.g. "3.20"
    pub price: String,
    pub unit: Option<String>,
    pub weight: Option<String>,
    pub image: Option<String>,
    pub origin: Option<String>,
    pub contents: Vec<BundleItemResponse>,
    /// Label shown when one unit of the product sits in the cart, e.g. "0.5 kg"
    pub quantity_label: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let quantity_label = CartLine::from_product(&p).quantity_label();
        Self {
            id: p.id,
            category_id: p.category_id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            unit: p.unit,
            weight: p.weight.as_ref().map(format_decimal),
            image: p.image,
            origin: p.origin,
            contents: p.contents.into_iter().map(BundleItemResponse::from).collect(),
            quantity_label,
        }
    }
}

fn products_response(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || state.catalog.list_categories()).await??;

    let body: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category id"),
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || state.catalog.get_category(id)).await??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// GET /categories/{id}/products
#[utoipa::path(
    get,
    path = "/categories/{id}/products",
    params(
        ("id" = i32, Path, description = "Category id"),
    ),
    responses(
        (status = 200, description = "Products of the category", body = Vec<ProductResponse>),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn list_category_products(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let products = web::block(move || state.catalog.products_in_category(id)).await??;

    Ok(HttpResponse::Ok().json(products_response(products)))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = web::block(move || state.catalog.list_products()).await??;

    Ok(HttpResponse::Ok().json(products_response(products)))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || state.catalog.get_product(id)).await??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}
