#![allow(dead_code)]

use revtopup::application::flow::{FlowController, FlowEvent};
use revtopup::config::AppConfig;
use revtopup::domain::ports::Clock;
use revtopup::infrastructure::in_memory::InMemorySessionStorage;

pub const EMAIL: &str = "rev.topup@outlook.com";
pub const PASSWORD: &str = "revtop.china";

pub fn controller() -> FlowController {
    controller_with(AppConfig::default())
}

pub fn controller_with(config: AppConfig) -> FlowController {
    FlowController::new(config, Box::new(InMemorySessionStorage::new()))
}

pub async fn login(controller: &mut FlowController, clock: &dyn Clock) {
    controller
        .apply(
            FlowEvent::Login {
                email: EMAIL.to_string(),
                password: PASSWORD.to_string(),
            },
            clock,
        )
        .await
        .unwrap();
}

/// Fills the composer with one row per amount (all with placeholder urls)
/// and the given country. Does not submit.
pub async fn compose(
    controller: &mut FlowController,
    clock: &dyn Clock,
    country: &str,
    amounts: &[&str],
) {
    controller
        .apply(FlowEvent::SelectCountry(country.to_string()), clock)
        .await
        .unwrap();
    for (i, amount) in amounts.iter().enumerate() {
        if i > 0 {
            controller.apply(FlowEvent::AddLink, clock).await.unwrap();
        }
        let row = i + 1;
        controller
            .apply(
                FlowEvent::SetUrl {
                    row,
                    value: format!("https://links.example/profile-{row}"),
                },
                clock,
            )
            .await
            .unwrap();
        controller
            .apply(
                FlowEvent::SetAmount {
                    row,
                    value: amount.to_string(),
                },
                clock,
            )
            .await
            .unwrap();
    }
}
