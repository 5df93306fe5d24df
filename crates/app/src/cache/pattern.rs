/// Redis-style glob match supporting `*` (any run) and `?` (one character).
pub(crate) fn matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some(&c) if c == '?' || Some(&c) == key.get(k) => {
                p += 1;
                k += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    k = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern.get(p..).is_some_and(|rest| rest.iter().all(|&c| c == '*'))
}
