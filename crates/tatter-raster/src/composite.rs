//! Composite operations over premultiplied RGBA

/// Raster blend rule deciding how a new draw combines with existing pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// Draw over existing content
    #[default]
    SourceOver,
    /// Draw only where the destination is opaque, keeping destination alpha
    SourceAtop,
    /// Erase the destination where the source is opaque
    DestinationOut,
    /// Additive blending
    Lighter,
}

impl CompositeOp {
    /// Blend premultiplied `src` onto premultiplied `dst`
    pub fn blend(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let sa = src[3];
        let da = dst[3];
        match self {
            CompositeOp::SourceOver => [
                src[0] + dst[0] * (1.0 - sa),
                src[1] + dst[1] * (1.0 - sa),
                src[2] + dst[2] * (1.0 - sa),
                sa + da * (1.0 - sa),
            ],
            CompositeOp::SourceAtop => [
                src[0] * da + dst[0] * (1.0 - sa),
                src[1] * da + dst[1] * (1.0 - sa),
                src[2] * da + dst[2] * (1.0 - sa),
                da,
            ],
            CompositeOp::DestinationOut => [
                dst[0] * (1.0 - sa),
                dst[1] * (1.0 - sa),
                dst[2] * (1.0 - sa),
                da * (1.0 - sa),
            ],
            CompositeOp::Lighter => [
                (src[0] + dst[0]).min(1.0),
                (src[1] + dst[1]).min(1.0),
                (src[2] + dst[2]).min(1.0),
                (sa + da).min(1.0),
            ],
        }
    }

    /// Canvas 2D name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::SourceAtop => "source-atop",
            CompositeOp::DestinationOut => "destination-out",
            CompositeOp::Lighter => "lighter",
        }
    }
}
