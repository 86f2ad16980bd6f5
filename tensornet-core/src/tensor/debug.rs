// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.read() {
            Ok(guard) => {
                write!(
                    f,
                    "Tensor(shape={:?}, strides={:?}, allocated={})",
                    guard.shape,
                    guard.strides,
                    guard.is_allocated(),
                )
            }
            Err(_) => write!(f, "Tensor(Error: RwLock poisoned)"),
        }
    }
}

/// Nested-bracket rendering of one slice of the flattened data, recursing
/// over the leading dimension. `shape` is never empty here.
fn fmt_slice(data: &[f32], shape: &[usize], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    if shape.len() == 1 {
        for (index, value) in data.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
    } else {
        let elements_in_dim = data.len() / shape[0];
        for index in 0..shape[0] {
            fmt_slice(
                &data[index * elements_in_dim..(index + 1) * elements_in_dim],
                &shape[1..],
                f,
            )?;
            if index + 1 != shape[0] {
                write!(f, ",\n")?;
            }
        }
    }
    write!(f, "]")
}

/// Debug-aid textual rendering: `Tensor()` for an empty tensor, a flat
/// bracketed list for rank 1, and recursively nested brackets with one line
/// per top-level slice for rank >= 2. Not a wire format.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        if guard.numel() == 0 {
            return write!(f, "Tensor()");
        }
        let data = guard.as_slice("Display").map_err(|_| fmt::Error)?;
        write!(f, "Tensor(")?;
        fmt_slice(data, &guard.shape, f)?;
        write!(f, ")")
    }
}
