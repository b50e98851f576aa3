use std::cmp::Ordering;

use crate::error::Result;
use crate::utils::xvec;

/// Stable top-down merge sort of `data` under `cmp`.
///
/// Each merge copies its span into a scratch buffer sized to that span. If
/// the scratch buffer cannot be allocated the failure handler runs and the
/// slice is left partially sorted but with every record still present.
pub fn mgsort<T, F>(data: &mut [T], mut cmp: F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if data.len() > 1 {
        sort_span(data, 0, data.len() - 1, &mut cmp)?;
    }
    Ok(())
}

fn sort_span<T, F>(data: &mut [T], i: usize, k: usize, cmp: &mut F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if i < k {
        let j = i + (k - i) / 2;
        sort_span(data, i, j, cmp)?;
        sort_span(data, j + 1, k, cmp)?;
        merge(data, i, j, k, cmp)?;
    }
    Ok(())
}

/// Merge the sorted runs `data[i..=j]` and `data[j + 1..=k]`.
fn merge<T, F>(data: &mut [T], i: usize, j: usize, k: usize, cmp: &mut F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut m = xvec::<T>(k - i + 1)?;
    let (mut ipos, mut jpos) = (i, j + 1);

    while ipos <= j && jpos <= k {
        // ties take the left run so equal records keep their order
        if cmp(&data[jpos], &data[ipos]) == Ordering::Less {
            m.push(data[jpos].clone());
            jpos += 1;
        } else {
            m.push(data[ipos].clone());
            ipos += 1;
        }
    }
    m.extend_from_slice(&data[ipos..=j]);
    if jpos <= k {
        m.extend_from_slice(&data[jpos..=k]);
    }

    data[i..=k].clone_from_slice(&m);
    Ok(())
}
