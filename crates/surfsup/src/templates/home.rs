use maud::{html, Markup, DOCTYPE};

/// Paths served under the JSON API, in the order they are listed
pub const API_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

pub fn home_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "SurfsUp Climate API" }
            }
            body {
                h1 { "Available Routes:" }
                ul {
                    @for route in API_ROUTES {
                        li { code { (route) } }
                    }
                }
                p {
                    "Dates use the YYYY-MM-DD format. "
                    a href="/docs" { "API Docs" }
                }
            }
        }
    }
}
