use actix_files::Files;
use actix_web::{App, HttpServer, web};

use sail_express::assets::ImageStore;
use sail_express::db::establish_connection_pool;
use sail_express::models::config::ServerConfig;
use sail_express::repository::DieselRepository;
use sail_express::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::load().map_err(std::io::Error::other)?;

    let pool = establish_connection_pool(&config.database_path).map_err(std::io::Error::other)?;
    let repo = DieselRepository::new(pool);
    repo.ensure_schema().map_err(std::io::Error::other)?;
    match repo.seed_demo_products() {
        Ok(0) => {}
        Ok(count) => log::info!("Seeded {count} demo products"),
        Err(e) => log::warn!("Demo catalog seeding failed: {e}"),
    }

    let images = ImageStore::new(&config.upload_path, config.max_upload_bytes);
    let upload_dir = config.upload_path.clone();
    let bind_addr = (config.host.clone(), config.port);

    log::info!("Starting catalog server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(images.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(routes::health)
            .service(routes::list_categories)
            .service(
                web::scope("/api/products")
                    .service(routes::products::list_products)
                    .service(routes::products::list_products_by_category)
                    .service(routes::products::create_product)
                    .service(routes::products::get_product)
                    .service(routes::products::update_product)
                    .service(routes::products::delete_product),
            )
            .service(Files::new(ImageStore::PUBLIC_PREFIX, upload_dir.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
