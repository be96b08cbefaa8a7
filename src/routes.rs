use crate::{
    api::{presence, users},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Per-IP limiter for the whole API scope
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst size are non-zero");
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
            // /users
            .service(web::resource("/users").route(web::get().to(users::list_users)))
            // /mean_time_weekday/{user_id}
            .service(
                web::resource("/mean_time_weekday")
                    .route(web::get().to(presence::mean_time_weekday_default)),
            )
            .service(
                web::resource("/mean_time_weekday/{user_id}")
                    .route(web::get().to(presence::mean_time_weekday)),
            )
            // /presence_weekday/{user_id}
            .service(
                web::resource("/presence_weekday")
                    .route(web::get().to(presence::presence_weekday_default)),
            )
            .service(
                web::resource("/presence_weekday/{user_id}")
                    .route(web::get().to(presence::presence_weekday)),
            )
            // /presence_start_end_per_weekday/{user_id}
            .service(
                web::resource("/presence_start_end_per_weekday")
                    .route(web::get().to(presence::presence_start_end_default)),
            )
            .service(
                web::resource("/presence_start_end_per_weekday/{user_id}")
                    .route(web::get().to(presence::presence_start_end)),
            ),
    );
}
