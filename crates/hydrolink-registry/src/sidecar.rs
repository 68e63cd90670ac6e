//! Raster metadata sidecar (VRT) parsing.
//!
//! The sidecar is a small XML document whose `MDI` items carry band
//! statistics and whose `NoDataValue` element carries the transparent fill
//! value. Both are required to build a usable raster style.

/// Statistics extracted from a raster's metadata sidecar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStats {
    pub minimum: f64,
    pub maximum: f64,
    pub nodata: f64,
}

/// Parse the sidecar document.
///
/// Fails when the document is not XML, when the minimum or maximum statistic
/// is absent or non-numeric, when minimum >= maximum (a degenerate range no
/// color ramp can span), or when the no-data value is absent.
pub fn parse_raster_stats(xml: &str) -> Result<RasterStats, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("invalid sidecar XML: {e}"))?;

    let mut minimum: Option<f64> = None;
    let mut maximum: Option<f64> = None;
    for node in doc.descendants().filter(|n| n.has_tag_name("MDI")) {
        match node.attribute("key") {
            Some("STATISTICS_MINIMUM") => minimum = node.text().and_then(|t| t.trim().parse().ok()),
            Some("STATISTICS_MAXIMUM") => maximum = node.text().and_then(|t| t.trim().parse().ok()),
            _ => {}
        }
    }

    let (Some(minimum), Some(maximum)) = (minimum, maximum) else {
        return Err("missing statistics in sidecar".to_string());
    };
    if minimum >= maximum {
        return Err(format!("degenerate value range: {minimum} >= {maximum}"));
    }

    let nodata = doc
        .descendants()
        .find(|n| n.has_tag_name("NoDataValue"))
        .and_then(|n| n.text())
        .and_then(|t| t.trim().parse().ok())
        .ok_or_else(|| "missing no-data value in sidecar".to_string())?;

    Ok(RasterStats {
        minimum,
        maximum,
        nodata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidecar(min: &str, max: &str, ndv: &str) -> String {
        format!(
            r#"<VRTDataset rasterXSize="10" rasterYSize="10">
  <VRTRasterBand dataType="Float32" band="1">
    <Metadata>
      <MDI key="STATISTICS_MINIMUM">{min}</MDI>
      <MDI key="STATISTICS_MAXIMUM">{max}</MDI>
      <MDI key="STATISTICS_MEAN">42.0</MDI>
    </Metadata>
    <NoDataValue>{ndv}</NoDataValue>
  </VRTRasterBand>
</VRTDataset>"#
        )
    }

    #[test]
    fn test_parses_statistics_and_nodata() {
        let stats = parse_raster_stats(&sidecar("1362.1", "2529.5", "-3.402823e+38")).unwrap();
        assert_eq!(stats.minimum, 1362.1);
        assert_eq!(stats.maximum, 2529.5);
        assert!(stats.nodata < stats.minimum);
    }

    #[test]
    fn test_missing_statistics_fails() {
        let xml = "<VRTDataset><VRTRasterBand><NoDataValue>0</NoDataValue></VRTRasterBand></VRTDataset>";
        assert!(parse_raster_stats(xml).unwrap_err().contains("statistics"));
    }

    #[test]
    fn test_degenerate_range_fails() {
        // Numeric comparison: 900 < 1000 as numbers even though "900" > "1000"
        // as strings, so this must parse fine...
        assert!(parse_raster_stats(&sidecar("900", "1000", "0")).is_ok());
        // ...while an actually inverted range must not.
        let err = parse_raster_stats(&sidecar("1000", "900", "0")).unwrap_err();
        assert!(err.contains("degenerate"));
        assert!(parse_raster_stats(&sidecar("5", "5", "0")).is_err());
    }

    #[test]
    fn test_missing_nodata_fails() {
        let xml = r#"<VRTDataset><VRTRasterBand>
            <Metadata>
              <MDI key="STATISTICS_MINIMUM">1</MDI>
              <MDI key="STATISTICS_MAXIMUM">2</MDI>
            </Metadata>
          </VRTRasterBand></VRTDataset>"#;
        assert!(parse_raster_stats(xml).unwrap_err().contains("no-data"));
    }

    #[test]
    fn test_not_xml_fails() {
        assert!(parse_raster_stats("<html>404 not found").is_err());
    }
}
