use paperclip::actix::web;

use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/api").service(
                web::scope("/bookings")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::get_requester_bookings))
                            .route(web::post().to(handlers::add_booking)),
                    )
                    .service(
                        web::resource("/owner").route(web::get().to(handlers::get_owner_bookings)),
                    )
                    .service(
                        web::scope("/item").service(
                            web::scope("/{item_id}")
                                .service(
                                    web::resource("/last")
                                        .route(web::get().to(handlers::get_last_booking)),
                                )
                                .service(
                                    web::resource("/next")
                                        .route(web::get().to(handlers::get_next_booking)),
                                )
                                .service(
                                    web::resource("/completed")
                                        .route(web::get().to(handlers::get_completed_booking)),
                                ),
                        ),
                    )
                    .service(
                        web::resource("/{booking_id}")
                            .route(web::get().to(handlers::get_booking))
                            .route(web::patch().to(handlers::update_booking_status)),
                    ),
            ),
        );
}
