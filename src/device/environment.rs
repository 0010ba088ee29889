#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{rgbe_to_rgb, Asset, Device, Environment, EnvironmentSource};
use half::f16;
use js_sys::Error;
use std::collections::HashMap;
use zerocopy::{AsBytes, FromBytes};

#[repr(align(16), C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct EnvironmentData {
    // (source, mip levels, 0, 0)
    params: [f32; 4],
}

impl Device {
    pub(crate) fn update_environment(
        &mut self,
        environment: &Environment,
        assets: &HashMap<Asset, Vec<u8>>,
    ) -> Result<(), Error> {
        match environment.source() {
            EnvironmentSource::Background => {
                // placeholder storage so the radiance sampler stays complete
                self.envmap_texture.create(1, 1);

                self.environment_buffer.write(&EnvironmentData {
                    params: [0.0, 1.0, 0.0, 0.0],
                })
            }
            EnvironmentSource::Equirect {
                pixels,
                width,
                height,
            } => {
                let data = assets
                    .get(pixels)
                    .ok_or_else(|| Error::new("environment pixel data missing"))?;

                let cols = *width as usize;
                let rows = *height as usize;

                let levels = prefilter_levels(cols, rows, data);

                info!(
                    "uploading radiance map ({}x{}, {} mip levels)",
                    cols,
                    rows,
                    levels.len()
                );

                self.envmap_texture.create_mipmapped(cols, rows, levels.len());

                for (level, (level_cols, level_rows, texels)) in levels.iter().enumerate() {
                    self.envmap_texture
                        .upload_level(level, *level_cols, *level_rows, texels);
                }

                self.environment_buffer.write(&EnvironmentData {
                    params: [1.0, levels.len() as f32, 0.0, 0.0],
                })
            }
        }
    }
}

/// Expands RGBE8 texels into a box-filtered half-float mip pyramid.
///
/// The coarser levels stand in for increasingly rough reflections when the
/// shader selects its sampling level from the surface roughness.
pub fn prefilter_levels(cols: usize, rows: usize, rgbe: &[u8]) -> Vec<(usize, usize, Vec<u16>)> {
    assert_eq!(rgbe.len(), cols * rows * 4);

    let mut base = Vec::with_capacity(cols * rows * 4);

    for texel in rgbe.chunks_exact(4) {
        let [r, g, b] = rgbe_to_rgb([texel[0], texel[1], texel[2], texel[3]]);

        base.extend_from_slice(&[r, g, b, 1.0]);
    }

    let mut levels = vec![];
    let mut level = (cols, rows, base);

    loop {
        let (cols, rows, ref texels) = level;

        levels.push((cols, rows, to_half(texels)));

        if cols == 1 && rows == 1 {
            return levels;
        }

        level = downsample(cols, rows, texels);
    }
}

fn downsample(cols: usize, rows: usize, texels: &[f32]) -> (usize, usize, Vec<f32>) {
    let next_cols = (cols / 2).max(1);
    let next_rows = (rows / 2).max(1);

    let mut next = Vec::with_capacity(next_cols * next_rows * 4);

    for row in 0..next_rows {
        for col in 0..next_cols {
            let mut sum = [0.0f32; 4];

            for &(dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)].iter() {
                let y = (2 * row + dy).min(rows - 1);
                let x = (2 * col + dx).min(cols - 1);

                let texel = &texels[4 * (y * cols + x)..4 * (y * cols + x) + 4];

                for channel in 0..4 {
                    sum[channel] += texel[channel];
                }
            }

            next.extend_from_slice(&[sum[0] / 4.0, sum[1] / 4.0, sum[2] / 4.0, 1.0]);
        }
    }

    (next_cols, next_rows, next)
}

fn to_half(texels: &[f32]) -> Vec<u16> {
    texels.iter().map(|&x| f16::from_f32(x).to_bits()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_rgbe(cols: usize, rows: usize, texel: [u8; 4]) -> Vec<u8> {
        texel
            .iter()
            .cloned()
            .cycle()
            .take(cols * rows * 4)
            .collect()
    }

    #[test]
    fn pyramid_reaches_one_by_one() {
        let levels = prefilter_levels(4, 2, &constant_rgbe(4, 2, [128, 64, 32, 136]));

        let dimensions: Vec<(usize, usize)> =
            levels.iter().map(|&(cols, rows, _)| (cols, rows)).collect();

        assert_eq!(dimensions, vec![(4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn constant_input_stays_constant_across_levels() {
        let levels = prefilter_levels(2, 2, &constant_rgbe(2, 2, [64, 64, 64, 136]));

        let expected = f16::from_f32(64.0).to_bits();

        for (_, _, texels) in &levels {
            for texel in texels.chunks(4) {
                assert_eq!(texel[0], expected);
                assert_eq!(texel[1], expected);
                assert_eq!(texel[2], expected);
            }
        }
    }

    #[test]
    fn downsampling_averages_each_quad() {
        let mut rgbe = vec![];
        rgbe.extend_from_slice(&[100, 0, 0, 136]);
        rgbe.extend_from_slice(&[0, 0, 0, 0]);
        rgbe.extend_from_slice(&[0, 0, 0, 0]);
        rgbe.extend_from_slice(&[0, 0, 0, 0]);

        let levels = prefilter_levels(2, 2, &rgbe);

        let (cols, rows, ref texels) = levels[1];
        assert_eq!((cols, rows), (1, 1));

        assert_eq!(texels[0], f16::from_f32(25.0).to_bits());
        assert_eq!(texels[1], f16::from_f32(0.0).to_bits());
    }

    #[test]
    fn level_counts_match_texture_storage() {
        for &(cols, rows) in &[(1, 1), (2, 2), (4, 2), (512, 512), (1024, 512)] {
            let levels = prefilter_levels(cols, rows, &constant_rgbe(cols, rows, [0, 0, 0, 0]));

            assert_eq!(
                levels.len(),
                crate::Texture::<crate::RGBA16F>::mip_levels(cols, rows),
                "for {}x{}",
                cols,
                rows
            );
        }
    }
}
