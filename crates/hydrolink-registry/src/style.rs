//! Default raster style generation.

use crate::sidecar::RasterStats;

/// Build the default greyscale styled-layer-descriptor for a raster layer.
///
/// The color map ramps black at the statistical minimum to white at the
/// maximum. The no-data value gets a fully transparent entry placed below or
/// above the ramp depending on which side of the value range it falls on;
/// a no-data value inside the range gets no entry (color map entries must be
/// in ascending quantity order and the ramp already covers it).
pub fn layer_style(stats: RasterStats, layer_id: &str) -> String {
    let ndv_entry = format!(
        r##"<ColorMapEntry color="#000000" quantity="{}" label="nodata" opacity="0.0" />"##,
        stats.nodata
    );
    let (low_ndv, high_ndv) = if stats.nodata < stats.minimum {
        (ndv_entry.as_str(), "")
    } else if stats.nodata > stats.maximum {
        ("", ndv_entry.as_str())
    } else {
        ("", "")
    };

    format!(
        r##"<?xml version="1.0" encoding="ISO-8859-1"?>
<StyledLayerDescriptor version="1.0.0" xmlns="http://www.opengis.net/sld" xmlns:ogc="http://www.opengis.net/ogc"
  xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
  xsi:schemaLocation="http://www.opengis.net/sld http://schemas.opengis.net/sld/1.0.0/StyledLayerDescriptor.xsd">
  <NamedLayer>
    <Name>simpleraster</Name>
    <UserStyle>
      <Name>{layer_id}</Name>
      <Title>Default raster style</Title>
      <Abstract>Default greyscale raster style</Abstract>
      <FeatureTypeStyle>
        <Rule>
          <RasterSymbolizer>
            <Opacity>1.0</Opacity>
            <ColorMap>
              {low_ndv}
              <ColorMapEntry color="#000000" quantity="{minimum}" label="values" />
              <ColorMapEntry color="#FFFFFF" quantity="{maximum}" label="values" />
              {high_ndv}
            </ColorMap>
          </RasterSymbolizer>
        </Rule>
      </FeatureTypeStyle>
    </UserStyle>
  </NamedLayer>
</StyledLayerDescriptor>"##,
        layer_id = layer_id,
        low_ndv = low_ndv,
        minimum = stats.minimum,
        maximum = stats.maximum,
        high_ndv = high_ndv,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(minimum: f64, maximum: f64, nodata: f64) -> RasterStats {
        RasterStats {
            minimum,
            maximum,
            nodata,
        }
    }

    #[test]
    fn test_nodata_below_range_precedes_ramp() {
        let sld = layer_style(stats(100.0, 200.0, -9999.0), "dem");
        let ndv_pos = sld.find("-9999").unwrap();
        let min_pos = sld.find("quantity=\"100\"").unwrap();
        assert!(ndv_pos < min_pos);
        assert_eq!(sld.matches("label=\"nodata\"").count(), 1);
    }

    #[test]
    fn test_nodata_above_range_follows_ramp() {
        let sld = layer_style(stats(100.0, 200.0, 65535.0), "dem");
        let ndv_pos = sld.find("65535").unwrap();
        let max_pos = sld.find("quantity=\"200\"").unwrap();
        assert!(ndv_pos > max_pos);
        assert_eq!(sld.matches("label=\"nodata\"").count(), 1);
    }

    #[test]
    fn test_nodata_inside_range_is_omitted() {
        let sld = layer_style(stats(100.0, 200.0, 150.0), "dem");
        assert!(!sld.contains("label=\"nodata\""));
    }

    #[test]
    fn test_style_names_the_layer() {
        let sld = layer_style(stats(0.0, 1.0, -1.0), "dem collection");
        assert!(sld.contains("<Name>dem collection</Name>"));
        assert!(sld.contains("<Name>simpleraster</Name>"));
    }
}
