//! Reprojection en Rust pur entre WGS84 et Web Mercator
//!
//! Le pipeline ne manipule que deux systèmes de référence :
//! - WGS84 (EPSG:4326) - entrée attendue par le service de registre
//! - Web Mercator (EPSG:3857) - sortie des enregistrements normalisés
//!
//! La paire étant fixe, une transformation sphérique suffit ; pas de
//! dépendance à une bibliothèque PROJ externe.

mod mercator;

use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

use crate::error::RosreestrError;

/// Reprojection entre deux EPSG supportés (4326 et 3857)
#[derive(Debug)]
pub struct Reprojector {
    source_epsg: u32,
    target_epsg: u32,
}

impl Reprojector {
    /// Crée un reprojector entre deux EPSG.
    ///
    /// Seuls 4326 et 3857 sont acceptés (identité comprise).
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, RosreestrError> {
        if !Self::is_supported(source_epsg) || !Self::is_supported(target_epsg) {
            return Err(RosreestrError::UnsupportedProjection {
                from_epsg: source_epsg,
                to_epsg: target_epsg,
            });
        }
        Ok(Self {
            source_epsg,
            target_epsg,
        })
    }

    /// Vérifie si un EPSG est supporté
    pub fn is_supported(epsg: u32) -> bool {
        matches!(epsg, 4326 | 3857)
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retourne le SRID cible
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        match (self.source_epsg, self.target_epsg) {
            (4326, 3857) => mercator::from_degrees(x, y),
            (3857, 4326) => mercator::to_degrees(x, y),
            // Identité (4326 -> 4326 ou 3857 -> 3857)
            _ => (x, y),
        }
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry, RosreestrError> {
        if self.source_epsg == self.target_epsg {
            return Ok(geom.clone());
        }

        match geom {
            Geometry::Point(p) => {
                let (x, y) = self.transform_point(p.x(), p.y());
                Ok(Geometry::Point(Point::new(x, y)))
            }
            Geometry::LineString(ls) => Ok(Geometry::LineString(self.transform_line(ls))),
            Geometry::Polygon(poly) => Ok(Geometry::Polygon(self.transform_polygon(poly))),
            Geometry::MultiPoint(mp) => {
                let points: Vec<Point> = mp
                    .iter()
                    .map(|p| {
                        let (x, y) = self.transform_point(p.x(), p.y());
                        Point::new(x, y)
                    })
                    .collect();
                Ok(Geometry::MultiPoint(MultiPoint::new(points)))
            }
            Geometry::MultiLineString(mls) => {
                let lines: Vec<LineString> =
                    mls.iter().map(|ls| self.transform_line(ls)).collect();
                Ok(Geometry::MultiLineString(MultiLineString::new(lines)))
            }
            Geometry::MultiPolygon(mp) => {
                let polys: Vec<Polygon> =
                    mp.iter().map(|poly| self.transform_polygon(poly)).collect();
                Ok(Geometry::MultiPolygon(MultiPolygon::new(polys)))
            }
            _ => Err(RosreestrError::geometry("unsupported geometry type")),
        }
    }

    fn transform_line(&self, ls: &LineString) -> LineString {
        LineString::new(
            ls.coords()
                .map(|c| {
                    let (x, y) = self.transform_point(c.x, c.y);
                    Coord { x, y }
                })
                .collect(),
        )
    }

    fn transform_polygon(&self, poly: &Polygon) -> Polygon {
        let exterior = self.transform_line(poly.exterior());
        let interiors: Vec<LineString> =
            poly.interiors().iter().map(|r| self.transform_line(r)).collect();
        Polygon::new(exterior, interiors)
    }
}
