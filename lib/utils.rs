//! Small conveniences for writing simulation binaries.

/// Construct a [`Complex64`][num_complex::Complex64].
///
/// ```ignore
/// c!(1.0)          // 1 + 0i
/// c!(i 2.0)        // 0 + 2i
/// c!(1.0, -0.5)    // 1 - 0.5i
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr ) => {
        ::num_complex::Complex64::new(0.0, $im)
    };
    ( $re:expr, $im:expr ) => {
        ::num_complex::Complex64::new($re, $im)
    };
    ( $re:expr ) => {
        ::num_complex::Complex64::new($re, 0.0)
    };
}

/// Create a directory and all its parents if it doesn't already exist,
/// returning early with the error otherwise.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        {
            let dir: &::std::path::Path = $dir.as_ref();
            if !dir.is_dir() {
                ::std::fs::create_dir_all(dir)?;
            }
        }
    };
}

/// Write a collection of arrays to a `.npz` file, returning early with any
/// error.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "time" => &time,
///         "rho" => &rho,
///     }
/// );
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),* $(,)? }
    ) => {
        {
            let mut npz
                = ::ndarray_npy::NpzWriter::new(::std::fs::File::create($path)?);
            $(
                npz.add_array($name, $arr)?;
            )*
            npz.finish()?;
        }
    };
}
