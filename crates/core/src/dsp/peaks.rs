/// Filters applied after local maxima are located.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakCriteria {
    /// Peaks lower than this are dropped.
    pub min_height: Option<f64>,
    /// Minimum index spacing between surviving peaks.
    pub min_distance: Option<usize>,
}

/// Indices of local maxima in `signal`.
///
/// Flat-topped peaks report the middle of the plateau (left of centre for
/// even widths). The first and last samples are never peaks. When peaks
/// are closer than `min_distance`, taller peaks are kept first and equal
/// heights favour the earlier sample.
pub fn find_peaks(signal: &[f64], criteria: &PeakCriteria) -> Vec<usize> {
    let mut peaks = local_maxima(signal);

    if let Some(min_height) = criteria.min_height {
        peaks.retain(|&i| signal[i] >= min_height);
    }

    match criteria.min_distance {
        Some(distance) if distance > 1 && peaks.len() > 1 => {
            select_by_distance(signal, &peaks, distance)
        }
        _ => peaks,
    }
}

fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn select_by_distance(signal: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    // Tallest first; among equals, earliest first.
    priority.sort_by(|&a, &b| {
        signal[peaks[b]]
            .total_cmp(&signal[peaks[a]])
            .then(a.cmp(&b))
    });

    let mut keep = vec![true; peaks.len()];
    for &j in &priority {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}
