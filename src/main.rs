use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use storefront_coupons::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    repos::{SeaOrmCouponStore, SeaOrmOrderHistory},
    services::CouponService,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 令牌由账户服务签发，这里只做校验
    let jwt_service = JwtService::new(&config.jwt.secret);

    let pool = Arc::new(pool);
    let coupon_service = CouponService::new(
        Arc::new(SeaOrmCouponStore::new(pool.clone())),
        Arc::new(SeaOrmOrderHistory::new(pool)),
        config.coupons.item_scoped_discounts,
    );

    log::info!(
        "Starting HTTP server at {}:{} (item scoped discounts: {})",
        config.server.host,
        config.server.port,
        config.coupons.item_scoped_discounts
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(coupon_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::coupon_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
