mod client;
mod decode;
mod store;

use tracing::{debug, info};

use crate::error::{HeatmapError, Result};

pub use client::{ErddapClient, TopoFetcher};
pub use decode::decode;
pub use store::{FileStore, PayloadStore};

#[cfg(test)]
pub use store::MemoryStore;

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use crate::config::DEFAULT_CELL_DEGREES;
    use crate::error::{HeatmapError, Result};
    use crate::topo::{resolve_strides, BoundingBox, MemoryStore, PayloadStore, TopoFetcher, TopoQuery, TopoSource};

    const PAYLOAD: &str = r#"{"table": {"rows": [[58.0, 24.0, 12], [58.0, 24.5, -3]]}}"#;

    struct CountingFetcher {
        calls: Cell<usize>,
        payload: &'static str,
    }

    impl TopoFetcher for CountingFetcher {
        fn fetch(&self, _: &TopoQuery) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.payload.to_string())
        }
    }

    fn counting(payload: &'static str) -> CountingFetcher {
        CountingFetcher { calls: Cell::new(0), payload }
    }

    fn query(lat_stride: u32, lng_stride: u32) -> TopoQuery {
        TopoQuery {
            bbox: BoundingBox::new(57.5, 60.0, 22.0, 29.0).unwrap(),
            lat_stride,
            lng_stride,
        }
    }

    #[test]
    fn bounding_box_rejects_inverted_ranges() {
        assert!(matches!(BoundingBox::new(60.0, 57.5, 22.0, 29.0), Err(HeatmapError::Config(_))));
        assert!(matches!(BoundingBox::new(57.5, 60.0, 29.0, 22.0), Err(HeatmapError::Config(_))));
        assert!(matches!(BoundingBox::new(f64::NAN, 60.0, 22.0, 29.0), Err(HeatmapError::Config(_))));
    }

    #[test]
    fn cache_key_encodes_all_six_parameters() {
        assert_eq!("topo_57.5-60-3_22-29-1.json", query(3, 1).cache_key());
    }

    #[test]
    fn url_queries_latitude_descending_and_longitude_ascending() {
        let url = query(2, 4).url("http://example.org/usgsCeSrtm30v6.json");
        assert_eq!("http://example.org/usgsCeSrtm30v6.json?topo[(60):2:(57.5)][(22):4:(29)]", url);
    }

    #[test]
    fn explicit_strides_pass_through() {
        let strides = resolve_strides(&query(3, 7), 100, 100, DEFAULT_CELL_DEGREES).unwrap();
        assert_eq!((3, 7), strides);
    }

    #[test]
    fn auto_strides_divide_both_spans_by_image_height() {
        // 2.5 / 0.0083333 / 10 ~ 30.0, 7.0 / 0.0083333 / 10 ~ 84.0
        let strides = resolve_strides(&query(0, 0), 11, 10, DEFAULT_CELL_DEGREES).unwrap();
        assert_eq!((30, 84), strides);

        let wider = resolve_strides(&query(0, 0), 1000, 10, DEFAULT_CELL_DEGREES).unwrap();
        assert_eq!(strides, wider);
    }

    #[test]
    fn auto_stride_never_drops_below_one() {
        let strides = resolve_strides(&query(0, 0), 4000, 4000, DEFAULT_CELL_DEGREES).unwrap();
        assert_eq!((1, 1), strides);
    }

    #[test]
    fn auto_strides_need_a_positive_height() {
        assert!(matches!(resolve_strides(&query(0, 0), 10, 0, DEFAULT_CELL_DEGREES), Err(HeatmapError::Config(_))));
    }

    #[test]
    fn second_load_reads_the_cache() {
        let source = TopoSource::new(counting(PAYLOAD), MemoryStore::default(), DEFAULT_CELL_DEGREES);

        let first = source.load_cache_or_fetch(&query(0, 0), 10, 10).unwrap();
        let second = source.load_cache_or_fetch(&query(0, 0), 10, 10).unwrap();

        assert_eq!(1, source.fetcher.calls.get());
        assert_eq!(first, second);
        assert_eq!(2, first.len());
        assert_eq!(-3.0, first[1].altitude);
    }

    #[test]
    fn fetched_payload_is_stored_under_resolved_key() {
        let source = TopoSource::new(counting(PAYLOAD), MemoryStore::default(), DEFAULT_CELL_DEGREES);
        source.load_cache_or_fetch(&query(0, 0), 11, 10).unwrap();

        let stored = source.store.get("topo_57.5-60-30_22-29-84.json").unwrap();
        assert_eq!(Some(PAYLOAD.to_string()), stored);
    }

    #[test]
    fn malformed_payload_is_not_cached() {
        let source = TopoSource::new(counting(r#"{"error": "nope"}"#), MemoryStore::default(), DEFAULT_CELL_DEGREES);

        let result = source.load_cache_or_fetch(&query(1, 1), 10, 10);

        assert!(matches!(result, Err(HeatmapError::Format(_))));
        assert_eq!(None, source.store.get(&query(1, 1).cache_key()).unwrap());
    }

    #[test]
    fn cached_payload_skips_the_fetcher() {
        let store = MemoryStore::default();
        store.put(&query(1, 1).cache_key(), PAYLOAD).unwrap();
        let source = TopoSource::new(counting("unused"), store, DEFAULT_CELL_DEGREES);

        let samples = source.load_cache_or_fetch(&query(1, 1), 10, 10).unwrap();

        assert_eq!(0, source.fetcher.calls.get());
        assert_eq!(2, samples.len());
    }
}

/// One elevation reading. Altitude is in meters, negative below sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

impl Sample {
    pub fn new(lat: f64, lng: f64, altitude: f64) -> Self {
        Sample { lat, lng, altitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Result<Self> {
        for (name, value) in [("min_lat", min_lat), ("max_lat", max_lat), ("min_lng", min_lng), ("max_lng", max_lng)] {
            if !value.is_finite() {
                return Err(HeatmapError::Config(format!("{} is not a finite number", name)));
            }
        }
        if min_lat > max_lat {
            return Err(HeatmapError::Config(format!("latitude range {}..{} is empty", min_lat, max_lat)));
        }
        if min_lng > max_lng {
            return Err(HeatmapError::Config(format!("longitude range {}..{} is empty", min_lng, max_lng)));
        }

        Ok(BoundingBox { min_lat, max_lat, min_lng, max_lng })
    }
}

/// A bounding box plus sampling strides. A stride of 0 is resolved from the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopoQuery {
    pub bbox: BoundingBox,
    pub lat_stride: u32,
    pub lng_stride: u32,
}

impl TopoQuery {
    pub fn cache_key(&self) -> String {
        let b = &self.bbox;
        format!(
            "topo_{}-{}-{}_{}-{}-{}.json",
            b.min_lat, b.max_lat, self.lat_stride, b.min_lng, b.max_lng, self.lng_stride
        )
    }

    /// Griddap query; latitude runs from north to south.
    pub fn url(&self, endpoint: &str) -> String {
        let b = &self.bbox;
        format!(
            "{}?topo[({}):{}:({})][({}):{}:({})]",
            endpoint, b.max_lat, self.lat_stride, b.min_lat, b.min_lng, self.lng_stride, b.max_lng
        )
    }

    pub fn with_strides(&self, (lat_stride, lng_stride): (u32, u32)) -> Self {
        TopoQuery { lat_stride, lng_stride, ..*self }
    }
}

/// Replaces "auto" (0) strides so that roughly one sample lands on each image row.
///
/// Both spans are divided by the image height, longitude included. Cache files
/// written so far are keyed on strides computed this way.
pub fn resolve_strides(query: &TopoQuery, _image_width: u32, image_height: u32, cell_degrees: f64) -> Result<(u32, u32)> {
    let auto = |stride: u32, min: f64, max: f64| -> Result<u32> {
        if stride != 0 {
            return Ok(stride);
        }
        if image_height == 0 {
            return Err(HeatmapError::Config("image height must be positive to derive a stride".to_string()));
        }
        let cells = ((max - min) / cell_degrees / image_height as f64).round();
        Ok(cells.max(1.0) as u32)
    };

    let b = &query.bbox;
    Ok((
        auto(query.lat_stride, b.min_lat, b.max_lat)?,
        auto(query.lng_stride, b.min_lng, b.max_lng)?,
    ))
}

pub struct TopoSource<F: TopoFetcher, S: PayloadStore> {
    fetcher: F,
    store: S,
    cell_degrees: f64,
}

impl<F: TopoFetcher, S: PayloadStore> TopoSource<F, S> {
    pub fn new(fetcher: F, store: S, cell_degrees: f64) -> Self {
        TopoSource { fetcher, store, cell_degrees }
    }

    /// Resolves strides for the target image, then decodes the cached payload or
    /// fetches, validates and caches a fresh one.
    pub fn load_cache_or_fetch(&self, query: &TopoQuery, image_width: u32, image_height: u32) -> Result<Vec<Sample>> {
        let query = query.with_strides(resolve_strides(query, image_width, image_height, self.cell_degrees)?);
        let key = query.cache_key();

        if let Some(payload) = self.store.get(&key)? {
            debug!(%key, "cache hit");
            return decode(&payload);
        }

        debug!(%key, "cache miss");
        let payload = self.fetcher.fetch(&query)?;
        let samples = decode(&payload)?;
        self.store.put(&key, &payload)?;
        info!(%key, bytes = payload.len(), samples = samples.len(), "cached topography");

        Ok(samples)
    }

    /// Cache key the query will use once its strides are resolved for the image.
    pub fn resolved_key(&self, query: &TopoQuery, image_width: u32, image_height: u32) -> Result<String> {
        let strides = resolve_strides(query, image_width, image_height, self.cell_degrees)?;
        Ok(query.with_strides(strides).cache_key())
    }
}
