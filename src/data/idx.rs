//! IDX binary dataset parsing (MNIST and derivatives).
//!
//! An IDX3 image file starts with a 16-byte header: two reserved zero
//! bytes, dtype `0x08` (uint8), dimension count `3`, then three big-endian
//! u32 fields (item count, rows, cols), followed by `n · rows · cols`
//! row-major pixel bytes. The matching IDX1 label file has an 8-byte
//! header (reserved, dtype, dimension count `1`, item count) followed by
//! one class-index byte per item.

use std::fs;
use std::path::Path;

/// A fixed-size flat-array sample set: index-aligned feature vectors and
/// one-hot target vectors.
pub struct SampleSet {
    /// Pixel vectors, each of length `rows * cols`, scaled to `[0, 1]`.
    pub inputs: Vec<Vec<f32>>,
    /// One-hot target vectors of length `n_classes`.
    pub targets: Vec<Vec<f32>>,
    pub rows: usize,
    pub cols: usize,
}

/// Expands an integer class label into a one-hot vector.
pub fn one_hot(class: usize, n_classes: usize) -> Vec<f32> {
    let mut v = vec![0.0; n_classes];
    v[class] = 1.0;
    v
}

/// Reads and parses an image/label IDX file pair from disk.
pub fn load_idx_pair(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
) -> Result<SampleSet, String> {
    let image_bytes = fs::read(&image_path)
        .map_err(|e| format!("cannot read {}: {e}", image_path.as_ref().display()))?;
    let label_bytes = fs::read(&label_path)
        .map_err(|e| format!("cannot read {}: {e}", label_path.as_ref().display()))?;
    parse_idx_pair(&image_bytes, &label_bytes, n_classes)
}

/// Parses an in-memory image/label IDX file pair into a [`SampleSet`].
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<SampleSet, String> {
    if n_classes < 2 {
        return Err(format!("n_classes must be at least 2, got {n_classes}"));
    }

    // Image header.
    if image_bytes.len() < 16 {
        return Err(format!(
            "IDX image file too short: need a 16-byte header, got {} bytes",
            image_bytes.len()
        ));
    }
    if image_bytes[0] != 0 || image_bytes[1] != 0 || image_bytes[2] != 0x08 {
        return Err(format!(
            "IDX image file: expected header 0x00 0x00 0x08, got 0x{:02X} 0x{:02X} 0x{:02X}",
            image_bytes[0], image_bytes[1], image_bytes[2]
        ));
    }
    if image_bytes[3] != 3 {
        return Err(format!(
            "IDX image file: expected 3 dimensions, got {} (not an IDX3 image file)",
            image_bytes[3]
        ));
    }

    let n_items = read_be_u32(image_bytes, 4) as usize;
    let rows = read_be_u32(image_bytes, 8) as usize;
    let cols = read_be_u32(image_bytes, 12) as usize;
    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| format!("IDX image file: {rows}x{cols} pixel count overflows"))?;
    let data_len = n_items
        .checked_mul(n_pixels)
        .ok_or_else(|| format!("IDX image file: {n_items} items of {n_pixels} pixels overflows"))?;

    if image_bytes.len() < 16 + data_len {
        return Err(format!(
            "IDX image file too short: header declares {n_items} items of {rows}x{cols} pixels \
             but only {} data bytes follow the header",
            image_bytes.len() - 16
        ));
    }

    // Label header.
    if label_bytes.len() < 8 {
        return Err(format!(
            "IDX label file too short: need an 8-byte header, got {} bytes",
            label_bytes.len()
        ));
    }
    if label_bytes[0] != 0 || label_bytes[1] != 0 || label_bytes[2] != 0x08 {
        return Err(format!(
            "IDX label file: expected header 0x00 0x00 0x08, got 0x{:02X} 0x{:02X} 0x{:02X}",
            label_bytes[0], label_bytes[1], label_bytes[2]
        ));
    }
    if label_bytes[3] != 1 {
        return Err(format!(
            "IDX label file: expected 1 dimension, got {} (not an IDX1 label file)",
            label_bytes[3]
        ));
    }
    let n_labels = read_be_u32(label_bytes, 4) as usize;
    if n_labels != n_items {
        return Err(format!(
            "IDX pair mismatch: image file declares {n_items} items, label file {n_labels}"
        ));
    }
    if label_bytes.len() < 8 + n_items {
        return Err(format!(
            "IDX label file too short: header declares {n_items} labels but only {} data bytes follow",
            label_bytes.len() - 8
        ));
    }

    let inputs: Vec<Vec<f32>> = image_bytes[16..16 + data_len]
        .chunks_exact(n_pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f32 / 255.0).collect())
        .collect();

    let mut targets = Vec::with_capacity(n_items);
    for (i, &class) in label_bytes[8..8 + n_items].iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(format!(
                "IDX label {i}: class index {class} is out of range for n_classes={n_classes}"
            ));
        }
        targets.push(one_hot(class, n_classes));
    }

    Ok(SampleSet {
        inputs,
        targets,
        rows,
        cols,
    })
}

fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal valid IDX3/IDX1 pair: two 2x2 images with labels 0 and 1.
    fn tiny_pair() -> (Vec<u8>, Vec<u8>) {
        let mut images = vec![0, 0, 0x08, 3];
        images.extend(2u32.to_be_bytes()); // items
        images.extend(2u32.to_be_bytes()); // rows
        images.extend(2u32.to_be_bytes()); // cols
        images.extend([0, 255, 128, 0, 255, 255, 0, 0]);

        let mut labels = vec![0, 0, 0x08, 1];
        labels.extend(2u32.to_be_bytes());
        labels.extend([0, 1]);
        (images, labels)
    }

    #[test]
    fn parses_a_valid_pair() {
        let (images, labels) = tiny_pair();
        let set = parse_idx_pair(&images, &labels, 2).unwrap();
        assert_eq!((set.rows, set.cols), (2, 2));
        assert_eq!(set.inputs.len(), 2);
        assert_eq!(set.inputs[0], vec![0.0, 1.0, 128.0 / 255.0, 0.0]);
        assert_eq!(set.targets[0], vec![1.0, 0.0]);
        assert_eq!(set.targets[1], vec![0.0, 1.0]);
    }

    #[test]
    fn rejects_truncated_image_data() {
        let (mut images, labels) = tiny_pair();
        images.truncate(images.len() - 3);
        assert!(parse_idx_pair(&images, &labels, 2).is_err());
    }

    #[test]
    fn rejects_item_count_mismatch() {
        let (images, mut labels) = tiny_pair();
        labels[4..8].copy_from_slice(&3u32.to_be_bytes());
        assert!(parse_idx_pair(&images, &labels, 2).is_err());
    }

    #[test]
    fn rejects_out_of_range_class() {
        let (images, mut labels) = tiny_pair();
        let last = labels.len() - 1;
        labels[last] = 9;
        assert!(parse_idx_pair(&images, &labels, 2).is_err());
    }

    #[test]
    fn rejects_wrong_magic() {
        let (mut images, labels) = tiny_pair();
        images[3] = 1; // wrong dimension count
        assert!(parse_idx_pair(&images, &labels, 2).is_err());
    }

    #[test]
    fn one_hot_sets_exactly_one_component() {
        let v = one_hot(3, 10);
        assert_eq!(v.iter().sum::<f32>(), 1.0);
        assert_eq!(v[3], 1.0);
    }
}
