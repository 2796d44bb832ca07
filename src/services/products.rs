//! Core business logic for the product endpoints.
//!
//! Each function validates input, composes the asset store with the
//! repository and converts faults into [`ServiceError`] variants so that the
//! HTTP routes can remain thin wrappers. Asset ordering on mutation: the new
//! file is written before its reference is persisted, and the old asset is
//! released only after the new reference is durably saved, so a failure
//! partway through never leaves a record pointing at a missing asset.

use crate::assets::{ImageStore, UploadedImage};
use crate::domain::locale::Locale;
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::ProductId;
use crate::dto::products::DisplayProduct;
use crate::forms::products::ProductDraft;
use crate::repository::{ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

/// List all products projected into the requested locale.
pub fn list_products<R>(locale: Locale, repo: &R) -> ServiceResult<Vec<DisplayProduct>>
where
    R: ProductReader,
{
    match repo.list_products() {
        Ok(products) => Ok(products
            .into_iter()
            .map(|p| DisplayProduct::localized(p, locale))
            .collect()),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// List products with an exact category match.
///
/// The category is deliberately not checked against the taxonomy; an
/// unknown value yields an empty list.
pub fn list_products_by_category<R>(
    category: &str,
    locale: Locale,
    repo: &R,
) -> ServiceResult<Vec<DisplayProduct>>
where
    R: ProductReader,
{
    match repo.list_products_by_category(category) {
        Ok(products) => Ok(products
            .into_iter()
            .map(|p| DisplayProduct::localized(p, locale))
            .collect()),
        Err(e) => {
            log::error!("Failed to list products by category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single product projected into the requested locale.
pub fn get_product<R>(id: i32, locale: Locale, repo: &R) -> ServiceResult<DisplayProduct>
where
    R: ProductReader,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(DisplayProduct::localized(product, locale)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a product, storing the uploaded image first so the persisted
/// reference always points at an existing asset.
pub fn create_product<R>(
    draft: ProductDraft,
    upload: Option<UploadedImage>,
    repo: &R,
    images: &ImageStore,
) -> ServiceResult<Product>
where
    R: ProductWriter,
{
    let new_product: NewProduct = draft.try_into()?;

    let image = match &upload {
        Some(upload) => Some(images.store(upload)?),
        None => None,
    };
    let new_product = new_product.with_image(image.clone());

    match repo.create_product(&new_product) {
        Ok(product) => Ok(product),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            if let Some(image) = &image {
                images.release(image);
            }
            Err(ServiceError::Internal)
        }
    }
}

/// Fully replace a product's state.
///
/// Omitted fields overwrite the stored values; only the image falls back to
/// the previous asset when no new file is supplied. A replaced asset is
/// released after the update is durably saved.
pub fn update_product<R>(
    id: i32,
    draft: ProductDraft,
    upload: Option<UploadedImage>,
    repo: &R,
    images: &ImageStore,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    let existing = match repo.get_product_by_id(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let new_product: NewProduct = draft.try_into()?;

    let stored = match &upload {
        Some(upload) => Some(images.store(upload)?),
        None => None,
    };
    let replaced = match &stored {
        Some(_) => existing.image.clone(),
        None => None,
    };
    let new_product = new_product.with_image(stored.clone().or(existing.image));

    match repo.update_product(id, &new_product) {
        Ok(Some(updated)) => {
            if let Some(old) = &replaced {
                images.release(old);
            }
            Ok(updated)
        }
        Ok(None) => {
            // Deleted between the existence check and the write.
            if let Some(stored) = &stored {
                images.release(stored);
            }
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            if let Some(stored) = &stored {
                images.release(stored);
            }
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a product and release its asset, if any.
pub fn delete_product<R>(id: i32, repo: &R, images: &ImageStore) -> ServiceResult<ProductId>
where
    R: ProductWriter,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.delete_product(id) {
        Ok(Some(deleted)) => {
            if let Some(image) = &deleted.image {
                images.release(image);
            }
            Ok(deleted.id)
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::Internal)
        }
    }
}
