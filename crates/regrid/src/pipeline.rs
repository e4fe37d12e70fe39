//! The regridding pipeline shared by all products.
//!
//! The geometry (projection, rotation and the splat plans of the valid and land cells) is derived once per
//! dataset and reused for every rendered product and frame.

use itertools::Itertools;

use crate::boundary::ContourOrder;
use crate::landmask::LandMaskCompositor;
use crate::rasterizer::{RasterizeStats, ScatterRasterizer, SplatOptions};
use crate::{
    BoundaryContour, Cell, DenseRaster, Error, FrameSelection, GeodeticAnchor, GeodeticProjector, Point, RasterNum,
    RasterSize, RasterStack, RegridConfig, Result, RigidRotation, RotationTransform, SourceGrid, Stage,
};

/// The product to render, naming the fields of the source grid it is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Product {
    /// Mean and standard deviation of a quantity
    MeanStd { mean: String, std: String },
    /// Exposure percentage
    Exposure { field: String },
    /// Residence time, placed with the precomputed rotated coordinates `xr` and `yr`
    ResidenceTime { field: String, xr: String, yr: String },
}

impl Product {
    /// Names of the rendered fields, in layer order
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Product::MeanStd { mean, std } => vec![mean.as_str(), std.as_str()],
            Product::Exposure { field } | Product::ResidenceTime { field, .. } => vec![field.as_str()],
        }
    }

    /// Drawing order of the boundary contour for this product
    pub fn contour_order(&self) -> ContourOrder {
        match self {
            Product::MeanStd { .. } | Product::ResidenceTime { .. } => ContourOrder::AsStored,
            Product::Exposure { .. } => ContourOrder::Reversed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub product: Product,
    pub selection: FrameSelection,
    /// Overlay contour, no overlay is produced when absent
    pub boundary: Option<BoundaryContour>,
    /// Cells to treat as land in addition to the land mask of the grid
    pub extra_land_cells: Vec<Cell>,
}

impl RenderRequest {
    pub fn new(product: Product, selection: FrameSelection) -> Self {
        RenderRequest {
            product,
            selection,
            boundary: None,
            extra_land_cells: Vec::new(),
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryContour) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn with_extra_land_cells(mut self, cells: Vec<Cell>) -> Self {
        self.extra_land_cells = cells;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedLayer<T: RasterNum = f64> {
    pub name: String,
    pub data: RasterStack<T>,
}

/// Aligned rasters ready for rendering: the `(T, H, W)` data layers, the `(H, W)` land mask and the
/// boundary contour in pixels of the cropped raster.
#[derive(Debug, Clone)]
pub struct RegridOutput<T: RasterNum = f64> {
    pub layers: Vec<NamedLayer<T>>,
    pub land_mask: DenseRaster<T>,
    pub boundary: Option<Vec<Point>>,
    pub stats: RasterizeStats,
}

impl<T: RasterNum> RegridOutput<T> {
    pub fn layer(&self, name: &str) -> Option<&RasterStack<T>> {
        self.layers.iter().find(|layer| layer.name == name).map(|layer| &layer.data)
    }
}

#[derive(Debug, Clone)]
pub struct RegridPipeline {
    config: RegridConfig,
    source_size: RasterSize,
    transform: RotationTransform,
    valid: ScatterRasterizer,
    land: ScatterRasterizer,
}

impl RegridPipeline {
    /// Project the anchor, derive the rotation of the grid and plan the rasterization of its cells.
    pub fn new<T: RasterNum>(config: RegridConfig, grid: &SourceGrid<T>, anchor: &GeodeticAnchor) -> Result<Self> {
        config.validate()?;

        let projector = GeodeticProjector::new(config.source_crs(), config.target_crs(), config.unit_divisor())?;
        let projected = projector.project(anchor)?;
        let rotation = RigidRotation::new(config.rotation_deg(), config.unit_divisor())?;
        let transform = RotationTransform::for_grid(rotation, grid.first_mesh_point(), &projected);

        Self::with_transform(config, grid, transform)
    }

    /// Pipeline with an explicit transform, skips the geodetic projection
    pub fn with_transform<T: RasterNum>(
        config: RegridConfig,
        grid: &SourceGrid<T>,
        transform: RotationTransform,
    ) -> Result<Self> {
        config.validate()?;

        let options = SplatOptions::from_config(&config);
        let valid = plan_cells(grid, &transform, grid.valid_cells(), &options);
        let land = plan_cells(grid, &transform, grid.land_cells(), &options);

        log::info!(
            "Regrid pipeline for grid {}: {} valid cells placed, {} dropped",
            grid.size(),
            valid.stats().placed,
            valid.stats().dropped
        );

        Ok(RegridPipeline {
            config,
            source_size: grid.size(),
            transform,
            valid,
            land,
        })
    }

    pub fn config(&self) -> &RegridConfig {
        &self.config
    }

    pub fn transform(&self) -> &RotationTransform {
        &self.transform
    }

    /// Size of every produced raster
    pub fn output_size(&self) -> RasterSize {
        self.config.crop().size()
    }

    pub fn render<T: RasterNum>(&self, grid: &SourceGrid<T>, request: &RenderRequest) -> Result<RegridOutput<T>> {
        if grid.size() != self.source_size {
            return Err(Error::ShapeMismatch {
                field: "grid".into(),
                expected: self.source_size,
                actual: grid.size(),
            });
        }

        if request.selection.is_empty() {
            return Err(Error::EmptyWindow("the frame selection contains no frames".into()));
        }

        let placement;
        let rasterizer = match &request.product {
            Product::ResidenceTime { xr, yr, .. } => {
                placement = self.config.placement().rasterizer(grid.field(xr)?, grid.field(yr)?)?;
                &placement
            }
            Product::MeanStd { .. } | Product::Exposure { .. } => &self.valid,
        };

        let layers = request
            .product
            .fields()
            .into_iter()
            .map(|name| -> Result<NamedLayer<T>> {
                let field = grid.field(name)?.select(&request.selection)?;
                Ok(NamedLayer {
                    name: name.to_string(),
                    data: rasterizer.rasterize(name, &field)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let frame0 = layers
            .first()
            .and_then(|layer| layer.data.frame(0))
            .ok_or_else(|| Error::geometry(Stage::Masking, "No data frame available for the land mask"))?;

        let land = self.land_plan(grid, &request.extra_land_cells)?;
        let compositor = LandMaskCompositor::new(land, self.config.land_patches().to_vec())?;
        let land_mask = compositor.compose(frame0)?;

        let boundary = request.boundary.as_ref().map(|contour| {
            contour.to_pixels(&self.transform, self.config.boundary_shift(), request.product.contour_order())
        });

        log::debug!(
            "Rendered {} layer(s) of {} frames, land mask with {} land pixels",
            layers.len(),
            request.selection.len(),
            land_mask.data_count()
        );

        Ok(RegridOutput {
            layers,
            land_mask,
            boundary,
            stats: rasterizer.stats(),
        })
    }

    fn land_plan<T: RasterNum>(&self, grid: &SourceGrid<T>, extra: &[Cell]) -> Result<ScatterRasterizer> {
        if extra.is_empty() {
            return Ok(self.land.clone());
        }

        let size = grid.size();
        if let Some(cell) = extra.iter().find(|cell| !size.contains(cell.row as i64, cell.col as i64)) {
            return Err(Error::geometry(
                Stage::Masking,
                format!("Land cell {cell:?} lies outside the grid {size}"),
            ));
        }

        // Keep the row-major write order of the grid land cells
        let cells = grid.land_cells().merge(extra.iter().copied().sorted()).dedup();
        Ok(plan_cells(grid, &self.transform, cells, &SplatOptions::from_config(&self.config)))
    }
}

fn plan_cells<T: RasterNum>(
    grid: &SourceGrid<T>,
    transform: &RotationTransform,
    cells: impl Iterator<Item = Cell>,
    options: &SplatOptions,
) -> ScatterRasterizer {
    ScatterRasterizer::new(
        grid.size(),
        cells.map(|cell| (cell, transform.to_pixel(grid.mesh_point(cell)))),
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{grid_200m, indexed_field};
    use crate::{CropWindow, ScalarField};

    fn pipeline(grid: &SourceGrid<f64>) -> Result<RegridPipeline> {
        let config = RegridConfig::builder()
            .canvas(RasterSize::square(20))
            .crop(CropWindow::new(0..10, 0..10)?)
            .rotation_deg(0.0)
            .build()?;

        let transform = RotationTransform::new(RigidRotation::new(0.0, 100.0)?, Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        RegridPipeline::with_transform(config, grid, transform)
    }

    #[test]
    fn mean_std_layers() -> Result<()> {
        let grid = grid_200m::<f64>(2, 2)
            .with_field("mean", indexed_field(3, 2, 2))?
            .with_field("std", indexed_field(3, 2, 2))?;

        let pipeline = pipeline(&grid)?;
        let request = RenderRequest::new(
            Product::MeanStd {
                mean: "mean".into(),
                std: "std".into(),
            },
            FrameSelection::from_indices(vec![2, 0]),
        );

        let output = pipeline.render(&grid, &request)?;
        assert_eq!(output.layers.len(), 2);

        let mean = output.layer("mean").expect("mean layer");
        assert_eq!(mean.shape(), (2, 10, 10));
        // Cell (0, 0) of the selected frame 2 lands on pixel (2, 2)
        assert_eq!(mean.frame(0).map(|f| f[Cell::from_row_col(2, 2)]), Some(200.0));
        assert_eq!(mean.frame(1).map(|f| f[Cell::from_row_col(2, 2)]), Some(0.0));
        assert!(output.boundary.is_none());
        Ok(())
    }

    #[test]
    fn missing_field() -> Result<()> {
        let grid = grid_200m::<f64>(2, 2);
        let pipeline = pipeline(&grid)?;
        let request = RenderRequest::new(Product::Exposure { field: "exp".into() }, FrameSelection::all(1));

        assert!(matches!(pipeline.render(&grid, &request), Err(Error::MissingField(_))));
        Ok(())
    }

    #[test]
    fn extra_land_cells() -> Result<()> {
        let grid = grid_200m::<f64>(2, 2)
            .with_validity_mask(vec![true, false, false, false])?
            .with_field("exp", ScalarField::new(1, 2, 2, vec![1.0, 2.0, 3.0, 4.0])?)?;

        let pipeline = pipeline(&grid)?;
        let request = RenderRequest::new(Product::Exposure { field: "exp".into() }, FrameSelection::all(1))
            .with_extra_land_cells(vec![Cell::from_row_col(1, 1)]);

        let output = pipeline.render(&grid, &request)?;
        // Cell (1, 1) maps onto pixel (4, 4)
        assert_eq!(output.land_mask[Cell::from_row_col(5, 5)], 1.0);
        // Pixels holding data are never land
        assert!(output.land_mask[Cell::from_row_col(3, 3)].is_nan());

        let invalid = request.with_extra_land_cells(vec![Cell::from_row_col(2, 0)]);
        assert_eq!(pipeline.render(&grid, &invalid).map(|_| ()).unwrap_err().stage(), Stage::Masking);
        Ok(())
    }

    #[test]
    fn grid_shape_must_match() -> Result<()> {
        let grid = grid_200m::<f64>(2, 2);
        let pipeline = pipeline(&grid)?;
        let other = grid_200m::<f64>(3, 2).with_field("exp", indexed_field(1, 3, 2))?;

        let request = RenderRequest::new(Product::Exposure { field: "exp".into() }, FrameSelection::all(1));
        assert!(matches!(pipeline.render(&other, &request), Err(Error::ShapeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn contour_order_per_product() {
        assert_eq!(
            Product::MeanStd {
                mean: "m".into(),
                std: "s".into()
            }
            .contour_order(),
            ContourOrder::AsStored
        );
        assert_eq!(Product::Exposure { field: "e".into() }.contour_order(), ContourOrder::Reversed);
        assert_eq!(
            Product::ResidenceTime {
                field: "rt".into(),
                xr: "xr".into(),
                yr: "yr".into()
            }
            .contour_order(),
            ContourOrder::AsStored
        );
    }
}
