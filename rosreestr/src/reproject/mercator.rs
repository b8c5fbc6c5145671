//! Projection Web Mercator (EPSG:3857)
//!
//! Aussi connu sous le nom de Pseudo-Mercator ou Spherical Mercator.
//! Modèle sphérique basé sur le rayon équatorial WGS84.

/// Rayon équatorial WGS84 (mètres)
pub const WGS84_A: f64 = 6_378_137.0;

/// Convertit des degrés géographiques (lon, lat) vers Web Mercator (EPSG:3857)
pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lon = lon_deg.to_radians();
    // Limiter la latitude pour éviter l'infini
    let lat = lat_deg
        .to_radians()
        .clamp(-85.06_f64.to_radians(), 85.06_f64.to_radians());

    let x = WGS84_A * lon;
    let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

/// Convertit Web Mercator (EPSG:3857) vers des degrés géographiques (lon, lat)
pub fn to_degrees(x: f64, y: f64) -> (f64, f64) {
    let lon = x / WGS84_A;
    let lat = 2.0 * (y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2;
    (lon.to_degrees(), lat.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moscow_to_web_mercator() {
        // Moscou: 37.6175°E, 55.7520°N
        let (x, y) = from_degrees(37.6175, 55.7520);

        // Valeurs attendues approximatives
        assert!((x - 4_187_540.0).abs() < 1_000.0, "x={}", x);
        assert!((y - 7_509_260.0).abs() < 10_000.0, "y={}", y);
    }

    #[test]
    fn test_roundtrip_precision() {
        let (x, y) = from_degrees(37.6175, 55.7520);
        let (lon, lat) = to_degrees(x, y);

        assert!((lon - 37.6175).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 55.7520).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_latitude_clamped_at_poles() {
        let (_, y_pole) = from_degrees(0.0, 90.0);
        let (_, y_limit) = from_degrees(0.0, 85.06);
        assert!(y_pole.is_finite());
        assert_eq!(y_pole, y_limit);
    }
}
