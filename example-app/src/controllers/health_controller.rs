use trellis::prelude::*;

pub struct HealthController;

impl Controller for HealthController {
    fn declare(d: &mut Declarer<'_>) {
        d.route_named("check", Verb::Get, "/health", "health");
    }
}

pub async fn check() -> &'static str {
    "OK"
}
