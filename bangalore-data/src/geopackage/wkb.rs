//! Extent extraction from GeoPackage geometry blobs.
//!
//! A GeoPackage geometry is a small header (magic `GP`, version, flags,
//! SRS id and an optional envelope) followed by standard WKB. The envelope
//! is used when present; otherwise the WKB coordinates are walked.

use geo::{Coord, Rect};
use thiserror::Error;

/// Errors raised while decoding a geometry blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    /// The blob ended before a complete value was read.
    #[error("geometry blob truncated at byte {offset}")]
    Truncated {
        /// Offset of the incomplete read.
        offset: usize,
    },
    /// The blob does not start with the `GP` magic.
    #[error("geometry blob has no GeoPackage header")]
    BadMagic,
    /// The header declares an envelope layout outside 0..=4.
    #[error("unknown envelope indicator {0}")]
    BadEnvelope(u8),
    /// A WKB byte-order marker is neither 0 nor 1.
    #[error("invalid WKB byte order {0}")]
    BadByteOrder(u8),
    /// The WKB type code is not a supported geometry.
    #[error("unsupported WKB geometry type {0}")]
    UnsupportedType(u32),
}

/// Running bounding box over coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Bounds {
    rect: Option<Rect<f64>>,
}

impl Bounds {
    pub(crate) fn include(&mut self, coord: Coord<f64>) {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return;
        }
        self.include_rect(Rect::new(coord, coord));
    }

    pub(crate) fn include_rect(&mut self, other: Rect<f64>) {
        self.rect = Some(match self.rect {
            None => other,
            Some(current) => Rect::new(
                Coord {
                    x: current.min().x.min(other.min().x),
                    y: current.min().y.min(other.min().y),
                },
                Coord {
                    x: current.max().x.max(other.max().x),
                    y: current.max().y.max(other.max().y),
                },
            ),
        });
    }

    pub(crate) const fn rect(self) -> Option<Rect<f64>> {
        self.rect
    }
}

/// Extent of one GeoPackage geometry blob; `None` for empty geometries.
pub fn blob_extent(blob: &[u8]) -> Result<Option<Rect<f64>>, BlobError> {
    let mut reader = Reader::new(blob);
    if reader.bytes(2)? != b"GP" {
        return Err(BlobError::BadMagic);
    }
    let _version = reader.u8()?;
    let flags = reader.u8()?;
    reader.little_endian = flags & 0x01 == 0x01;
    let envelope = (flags >> 1) & 0x07;
    let empty = flags & 0x10 == 0x10;
    let _srs_id = reader.u32()?;

    let doubles = match envelope {
        0 => 0,
        1 => 4,
        2 | 3 => 6,
        4 => 8,
        other => return Err(BlobError::BadEnvelope(other)),
    };
    if empty {
        return Ok(None);
    }
    if doubles > 0 {
        // Envelope order is minx, maxx, miny, maxy; any Z/M ranges follow.
        let (min_x, max_x) = (reader.f64()?, reader.f64()?);
        let (min_y, max_y) = (reader.f64()?, reader.f64()?);
        if [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
            return Ok(Some(Rect::new(
                Coord { x: min_x, y: min_y },
                Coord { x: max_x, y: max_y },
            )));
        }
        reader.skip((doubles - 4) * 8)?;
    }

    let mut bounds = Bounds::default();
    walk_geometry(&mut reader, &mut bounds)?;
    Ok(bounds.rect())
}

fn walk_geometry(reader: &mut Reader<'_>, bounds: &mut Bounds) -> Result<(), BlobError> {
    reader.little_endian = match reader.u8()? {
        0 => false,
        1 => true,
        other => return Err(BlobError::BadByteOrder(other)),
    };
    let code = reader.u32()?;
    let (base, dims) = split_type(code)?;
    // Curves are bounded by their control points.
    match base {
        1 => read_coord(reader, dims, bounds),
        2 | 8 => read_points(reader, dims, bounds),
        3 => {
            for _ in 0..reader.u32()? {
                read_points(reader, dims, bounds)?;
            }
            Ok(())
        }
        4..=7 | 9..=12 => {
            for _ in 0..reader.u32()? {
                walk_geometry(reader, bounds)?;
            }
            Ok(())
        }
        _ => Err(BlobError::UnsupportedType(code)),
    }
}

/// Split an ISO or EWKB type code into base type and coordinate width.
fn split_type(code: u32) -> Result<(u32, usize), BlobError> {
    const EWKB_Z: u32 = 0x8000_0000;
    const EWKB_M: u32 = 0x4000_0000;
    const EWKB_SRID: u32 = 0x2000_0000;

    if code & (EWKB_Z | EWKB_M | EWKB_SRID) != 0 {
        if code & EWKB_SRID != 0 {
            return Err(BlobError::UnsupportedType(code));
        }
        let dims = 2 + usize::from(code & EWKB_Z != 0) + usize::from(code & EWKB_M != 0);
        return Ok((code & 0x0FFF_FFFF, dims));
    }
    let dims = match code / 1000 {
        0 => 2,
        1 | 2 => 3,
        3 => 4,
        _ => return Err(BlobError::UnsupportedType(code)),
    };
    Ok((code % 1000, dims))
}

fn read_points(reader: &mut Reader<'_>, dims: usize, bounds: &mut Bounds) -> Result<(), BlobError> {
    for _ in 0..reader.u32()? {
        read_coord(reader, dims, bounds)?;
    }
    Ok(())
}

fn read_coord(reader: &mut Reader<'_>, dims: usize, bounds: &mut Bounds) -> Result<(), BlobError> {
    let x = reader.f64()?;
    let y = reader.f64()?;
    reader.skip((dims - 2) * 8)?;
    bounds.include(Coord { x, y });
    Ok(())
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
    little_endian: bool,
}

impl<'a> Reader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            little_endian: true,
        }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], BlobError> {
        let end = self.offset.checked_add(len);
        let slice = end
            .and_then(|end| self.data.get(self.offset..end))
            .ok_or(BlobError::Truncated {
                offset: self.offset,
            })?;
        self.offset += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), BlobError> {
        self.bytes(len).map(|_| ())
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BlobError> {
        let offset = self.offset;
        self.bytes(N)?
            .try_into()
            .map_err(|_| BlobError::Truncated { offset })
    }

    fn u8(&mut self) -> Result<u8, BlobError> {
        self.array::<1>().map(|[byte]| byte)
    }

    fn u32(&mut self) -> Result<u32, BlobError> {
        let raw = self.array::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn f64(&mut self) -> Result<f64, BlobError> {
        let raw = self.array::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }
}
