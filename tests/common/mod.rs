//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use opensoftware::core::{Catalog, FixedClock, Product};
use serde_json::json;

/// A minimal valid product
pub fn product(id: &str, name: &str, rating: f64, downloads: u64) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "description": format!("{} description", name),
        "fullDescription": format!("{} full description", name),
        "category": "Utilidades",
        "version": "1.0",
        "company": "Acme",
        "rating": rating,
        "downloads": downloads,
        "image": format!("/images/{}.png", id),
        "tags": [],
        "systemRequirements": {
            "os": ["Windows 10"],
            "processor": "x64",
            "memory": "4 GB",
            "storage": "1 GB"
        },
        "features": [],
        "releaseDate": "2024-01-01",
        "size": "10 MB"
    }))
    .expect("fixture product is valid")
}

/// The two-product catalog used by the engine examples
pub fn photoshop_and_winrar() -> Catalog {
    let mut photoshop = product("adobe-photoshop", "Adobe Photoshop", 4.8, 15_600_000);
    photoshop.company = "Adobe".to_string();
    photoshop.category = "Diseño Gráfico".to_string();
    photoshop.tags = vec!["Edición".to_string(), "Fotografía".to_string()];

    let mut winrar = product("winrar", "WinRAR", 4.5, 30_000_000);
    winrar.company = "win.rar GmbH".to_string();
    winrar.tags = vec!["Compresión".to_string(), "ZIP".to_string()];

    Catalog::new(vec![photoshop, winrar]).expect("fixture catalog is valid")
}

pub fn bundled() -> Catalog {
    Catalog::bundled().expect("bundled catalog loads")
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_time())
}
