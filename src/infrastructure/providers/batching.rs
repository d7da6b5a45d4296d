/// Longest prefix of `text` that fits in `max_bytes` and ends on a char
/// boundary. Safe for log previews and byte-budgeted chunking of
/// multibyte text.
pub fn clip_to_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Split text into batches that respect sentence boundaries, each at most
/// `max_batch_size` bytes. A single sentence over the limit is hard-split
/// at char boundaries; text without sentence punctuation is chunked the
/// same way.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    // Split on sentence-ending punctuation
    let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
    let mut pieces: Vec<&str> = Vec::new();
    let mut last_end = 0;

    for mat in sentence_pattern.find_iter(text) {
        pieces.push(&text[last_end..mat.end()]);
        last_end = mat.end();
    }
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();

    for piece in pieces {
        // If adding this piece would exceed the limit, save current batch
        if !current_batch.is_empty() && current_batch.len() + piece.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if piece.len() > max_batch_size {
            // The piece alone is over the limit: hard-split it
            let mut rest = piece;
            while rest.len() > max_batch_size {
                let chunk = clip_to_char_boundary(rest, max_batch_size);
                // A limit smaller than one char still has to make progress
                let chunk_len = if chunk.is_empty() {
                    rest.chars().next().map(|c| c.len_utf8()).unwrap_or(rest.len())
                } else {
                    chunk.len()
                };
                let trimmed = rest[..chunk_len].trim();
                if !trimmed.is_empty() {
                    batches.push(trimmed.to_string());
                }
                rest = &rest[chunk_len..];
            }
            current_batch.push_str(rest);
        } else {
            current_batch.push_str(piece);
        }
    }

    if !current_batch.is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}
