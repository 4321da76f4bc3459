//! Greedy packing
//!
//! First-fit over units in document order. Units are never reordered or
//! split. A unit that alone exceeds the budget always stands in a region by
//! itself. Zero-length units never open a region: they ride along with the
//! neighbouring region, so every region has positive length unless the whole
//! input has none.

/// Units packed into one region with their summed length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRegion<P> {
    pub units: Vec<P>,
    pub length: usize,
}

impl<P> PackedRegion<P> {
    fn empty() -> Self {
        PackedRegion {
            units: Vec::new(),
            length: 0,
        }
    }
}

/// Pack `(unit, length)` pairs into regions of at most `budget` (inclusive)
pub fn pack_units<P, I>(units: I, budget: usize) -> Vec<PackedRegion<P>>
where
    I: IntoIterator<Item = (P, usize)>,
{
    let mut regions = Vec::new();
    let mut current = PackedRegion::empty();
    // Zero-length units met while no region is open
    let mut pending = Vec::new();

    for (unit, length) in units {
        if length == 0 {
            if current.units.is_empty() {
                pending.push(unit);
            } else {
                current.units.push(unit);
            }
            continue;
        }

        if length > budget {
            flush(&mut regions, &mut current);
            tracing::trace!(length, budget, "oversized unit packed alone");
            let mut lone = std::mem::take(&mut pending);
            lone.push(unit);
            regions.push(PackedRegion {
                units: lone,
                length,
            });
            continue;
        }

        if current.length + length > budget {
            tracing::trace!(
                sum = current.length,
                length,
                budget,
                "region full, starting next"
            );
            flush(&mut regions, &mut current);
        }
        if current.units.is_empty() {
            current.units.append(&mut pending);
        }
        current.units.push(unit);
        current.length += length;
    }
    flush(&mut regions, &mut current);

    if !pending.is_empty() {
        match regions.last_mut() {
            Some(last) => last.units.append(&mut pending),
            None => regions.push(PackedRegion {
                units: pending,
                length: 0,
            }),
        }
    }

    regions
}

fn flush<P>(regions: &mut Vec<PackedRegion<P>>, current: &mut PackedRegion<P>) {
    if !current.units.is_empty() {
        regions.push(std::mem::replace(current, PackedRegion::empty()));
    }
}
