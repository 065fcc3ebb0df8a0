/// 地球平均半径（米）
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// 两个经纬度坐标之间的球面距离（haversine 公式），单位米
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_distance(36.75, 3.06, 36.75, 3.06), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 1° 纬度约 111.195 km
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 1.0, "distance was {d}");
    }

    #[test]
    fn symmetric() {
        let a = haversine_distance(36.7525, 3.04197, 36.7538, 3.0588);
        let b = haversine_distance(36.7538, 3.0588, 36.7525, 3.04197);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn short_campus_distance() {
        // 同一经度上 0.001° 纬度约 111 m
        let d = haversine_distance(36.7500, 3.0600, 36.7510, 3.0600);
        assert!(d > 100.0 && d < 120.0, "distance was {d}");
    }
}
