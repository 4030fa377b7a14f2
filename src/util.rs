use bit_vec::BitVec;

/// `{0, 2}` style listing of the set ordinals
pub fn format_column_set(columns: &BitVec) -> String {
    let set: Vec<String> = set_ordinals(columns).map(|i| i.to_string()).collect();
    format!("{{{}}}", set.join(", "))
}

pub fn set_ordinals(columns: &BitVec) -> impl Iterator<Item = usize> + '_ {
    columns
        .iter()
        .enumerate()
        .filter(|(_, bit)| *bit)
        .map(|(i, _)| i)
}

/// true when every ordinal set in `required` is also set in `permitted`
pub fn covers_all(permitted: &BitVec, required: &BitVec) -> bool {
    set_ordinals(required).all(|i| permitted.get(i).unwrap_or(false))
}

// BitVec set operations panic on differing lengths
fn align(a: &mut BitVec, b: &BitVec) -> BitVec {
    let mut b = b.clone();
    if a.len() < b.len() {
        a.grow(b.len() - a.len(), false);
    } else {
        b.grow(a.len() - b.len(), false);
    }
    b
}

/// `target |= other`, true if `target` changed
pub fn union_into(target: &mut BitVec, other: &BitVec) -> bool {
    let other = align(target, other);
    target.or(&other)
}

/// `target &= !other`, true if `target` changed
#[cfg(feature = "memory-dictionary")]
pub fn difference_into(target: &mut BitVec, other: &BitVec) -> bool {
    let other = align(target, other);
    target.difference(&other)
}
