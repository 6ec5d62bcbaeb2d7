use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Route path and what it returns, in the order shown on the home page
pub const ROUTES: [(&str, &str); 5] = [
    ("/api/v1.0/precipitation", "Precipitation by date for the last year of data"),
    ("/api/v1.0/stations", "Station names keyed by station code"),
    ("/api/v1.0/tobs", "Temperature observations of the most active station for the last year of data"),
    (
        "/api/v1.0/{start}",
        "Minimum, maximum and average temperature for all dates on or after start (MMDDYYYY, e.g. /api/v1.0/01012017)",
    ),
    (
        "/api/v1.0/{start}/{end}",
        "Minimum, maximum and average temperature for all dates between start and end inclusive (e.g. /api/v1.0/01012017/12312017)",
    ),
];

pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate Analysis",
        api_base,
    };

    base(&config, content())
}

fn content() -> Markup {
    html! {
        h1 { "Welcome to Hawaii Climate Analysis Homepage" }
        p { "Following are the available routes for Hawaii Climate Analysis:" }
        ul {
            @for (path, description) in ROUTES {
                li {
                    code { (path) }
                    " - "
                    (description)
                }
            }
        }
    }
}
