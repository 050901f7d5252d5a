use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use gencorpus_backend::{
    config::Config,
    database::init_db,
    external::{EmailSender, ResendMailer},
    handlers,
    middlewares::create_cors,
    services::{ComplaintService, OtpService},
    swagger::swagger_config,
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

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = init_db(&config.database)
        .await
        .expect("Failed to initialise the database");

    let mailer: Arc<dyn EmailSender> = Arc::new(ResendMailer::new(config.resend.clone()));

    let otp_service = OtpService::new(pool.clone(), mailer.clone());
    let complaint_service = ComplaintService::new(pool.clone(), mailer.clone());
    let mailer_data: web::Data<dyn EmailSender> = web::Data::from(mailer);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(otp_service.clone()))
            .app_data(web::Data::new(complaint_service.clone()))
            .app_data(mailer_data.clone())
            .configure(swagger_config)
            .configure(handlers::health_config)
            .configure(handlers::otp_config)
            .configure(handlers::notification_config)
            .service(web::scope("/api/v1").configure(handlers::complaint_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
