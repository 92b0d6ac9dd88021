/// Strip the acute accents the tooltip extension folds before lookup.
///
/// Only `á é í ó ú` and their capitals are touched; other diacritics
/// (ñ, ü, ç, ...) are kept because the extension keeps them too.
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' => 'U',
            other => other,
        })
        .collect()
}
