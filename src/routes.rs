use crate::api::{attendance, dashboard, employee, health, reports};
use crate::config::Config;
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    // Public system routes
    cfg.service(web::resource("/").route(web::get().to(health::root)))
        .service(web::resource("/health").route(web::get().to(health::health)));

    // API routes
    cfg.service(
        web::scope("/api")
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(attendance::employee_attendance)),
                    ),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard_stats)))
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/attendance-summary")
                            .route(web::get().to(reports::attendance_summary)),
                    )
                    .service(
                        web::resource("/employee-performance/{employee_id}")
                            .route(web::get().to(reports::employee_performance)),
                    )
                    .service(
                        web::resource("/department")
                            .route(web::get().to(reports::department_report)),
                    ),
            ),
    );
}
