use crate::data::model::DatasetView;

pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

pub const MAP_GUIDANCE: &str =
    "No 'Latitude' or 'Longitude' columns found for mapping. Add both columns to plot your data points.";

#[derive(Debug, Clone, PartialEq)]
pub enum MapModel {
    /// `[longitude, latitude]` pairs, one per row with both coordinates.
    Points(Vec<[f64; 2]>),
    Guidance(&'static str),
}

/// Place one point per row using `Latitude`/`Longitude`. Rows with a
/// missing or non-numeric coordinate are left off the map.
pub fn map_points(view: &DatasetView<'_>) -> MapModel {
    let ds = view.dataset;
    let (Some(lat), Some(lon)) = (ds.column(LATITUDE_COLUMN), ds.column(LONGITUDE_COLUMN)) else {
        return MapModel::Guidance(MAP_GUIDANCE);
    };

    let points = view
        .rows()
        .filter_map(|(_, row)| {
            let la = row[lat.index()].as_f64()?;
            let lo = row[lon.index()].as_f64()?;
            Some([lo, la])
        })
        .collect();

    MapModel::Points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Dataset};

    #[test]
    fn missing_coordinates_give_guidance() {
        let ds = Dataset::from_rows(
            vec!["Category".into(), "Latitude".into()],
            vec![vec![CellValue::Text("A".into()), CellValue::Float(40.0)]],
        );
        assert_eq!(map_points(&ds.full_view()), MapModel::Guidance(MAP_GUIDANCE));
    }

    #[test]
    fn points_are_lon_lat_and_skip_gaps() {
        let ds = Dataset::from_rows(
            vec!["Latitude".into(), "Longitude".into()],
            vec![
                vec![CellValue::Float(40.7), CellValue::Float(-74.0)],
                vec![CellValue::Null, CellValue::Float(-80.0)],
                vec![CellValue::Integer(34), CellValue::Float(-118.2)],
            ],
        );
        let model = map_points(&ds.full_view());
        assert_eq!(model, MapModel::Points(vec![[-74.0, 40.7], [-118.2, 34.0]]));
    }

    #[test]
    fn empty_view_still_has_a_map() {
        let ds = Dataset::from_rows(vec!["Latitude".into(), "Longitude".into()], Vec::new());
        assert_eq!(map_points(&ds.full_view()), MapModel::Points(Vec::new()));
    }
}
