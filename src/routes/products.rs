use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

use crate::assets::ImageStore;
use crate::domain::locale::Locale;
use crate::forms::products::ProductForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{ensure_api_key, error_response};
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    list_products_by_category as list_products_by_category_service,
    update_product as update_product_service,
};

#[derive(Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

#[get("")]
pub async fn list_products(
    params: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let locale = Locale::from_param(params.locale.as_deref());
    match list_products_service(locale, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(json!({
            "success": true,
            "count": products.len(),
            "locale": locale.as_str(),
            "data": products,
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}

#[get("/category/{category}")]
pub async fn list_products_by_category(
    category: web::Path<String>,
    params: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let locale = Locale::from_param(params.locale.as_deref());
    let category = category.into_inner();
    match list_products_by_category_service(&category, locale, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(json!({
            "success": true,
            "count": products.len(),
            "category": category,
            "locale": locale.as_str(),
            "data": products,
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}

#[get("/{id}")]
pub async fn get_product(
    id: web::Path<i32>,
    params: web::Query<LocaleQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let locale = Locale::from_param(params.locale.as_deref());
    match get_product_service(id.into_inner(), locale, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(json!({
            "success": true,
            "locale": locale.as_str(),
            "data": product,
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}

#[post("")]
pub async fn create_product(
    req: HttpRequest,
    form: MultipartForm<ProductForm>,
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(err) = ensure_api_key(&req, &config) {
        return error_response(&err, config.hardened);
    }

    let (draft, upload) = match form.into_inner().into_parts() {
        Ok(parts) => parts,
        Err(err) => {
            log::error!("Failed to read uploaded file: {err}");
            return error_response(&ServiceError::Internal, config.hardened);
        }
    };

    match create_product_service(draft, upload, repo.get_ref(), images.get_ref()) {
        Ok(product) => HttpResponse::Created().json(json!({
            "success": true,
            "data": product,
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}

#[put("/{id}")]
pub async fn update_product(
    req: HttpRequest,
    id: web::Path<i32>,
    form: MultipartForm<ProductForm>,
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(err) = ensure_api_key(&req, &config) {
        return error_response(&err, config.hardened);
    }

    let (draft, upload) = match form.into_inner().into_parts() {
        Ok(parts) => parts,
        Err(err) => {
            log::error!("Failed to read uploaded file: {err}");
            return error_response(&ServiceError::Internal, config.hardened);
        }
    };

    match update_product_service(id.into_inner(), draft, upload, repo.get_ref(), images.get_ref())
    {
        Ok(product) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": product,
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}

#[delete("/{id}")]
pub async fn delete_product(
    req: HttpRequest,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(err) = ensure_api_key(&req, &config) {
        return error_response(&err, config.hardened);
    }

    match delete_product_service(id.into_inner(), repo.get_ref(), images.get_ref()) {
        Ok(id) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": id.get(), "deleted": true },
        })),
        Err(err) => error_response(&err, config.hardened),
    }
}
