//! Python bindings for granulo via PyO3.
//!
//! Every function accepts a 2D numpy array of any integer or float dtype
//! (converted to f64) and returns new f64 arrays; inputs are never
//! modified. Errors surface as `ValueError`.

use numpy::ndarray::Array2;
use numpy::{
    Element, IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2, PyUntypedArray,
    PyUntypedArrayMethods,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use granulo_algorithms::granulometry::{compute_size_spectrum, SpectrumParams};
use granulo_algorithms::morphology::{
    area_opening as compute_area_opening, remove_background as compute_remove_background,
};
use granulo_algorithms::resample::rescale as compute_rescale;
use granulo_core::{Connectivity, Image, Sample};

/// Build an Image<f64> from a typed numpy 2D array.
///
/// Any memory layout is accepted; samples are copied in row-major order.
fn numpy_to_image<T>(arr: &PyReadonlyArray2<'_, T>) -> Image<f64>
where
    T: Sample + Element,
{
    Image::from_array(arr.as_array().to_owned()).to_f64()
}

/// Build an Image<f64> from any 2D numeric numpy array.
///
/// Integer and f32 inputs are widened to f64, like `img.astype(float)`.
fn any_to_image(img: &Bound<'_, PyAny>) -> PyResult<Image<f64>> {
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, f64>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, f32>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, u8>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, u16>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, u32>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, i32>>() {
        return Ok(numpy_to_image(&arr));
    }
    if let Ok(arr) = img.extract::<PyReadonlyArray2<'_, i64>>() {
        return Ok(numpy_to_image(&arr));
    }

    let described = match img.downcast::<PyUntypedArray>() {
        Ok(arr) => format!("{}-D array of dtype {}", arr.ndim(), arr.dtype()),
        Err(_) => img.get_type().name()?.to_string(),
    };
    Err(PyValueError::new_err(format!(
        "expected a 2-D numeric numpy array, got {}",
        described
    )))
}

/// Convert Image<f64> back to a numpy 2D array.
fn image_to_numpy<'py>(py: Python<'py>, image: Image<f64>) -> Bound<'py, PyArray2<f64>> {
    let arr: Array2<f64> = image.into_array();
    arr.into_pyarray(py)
}

fn to_py_err(e: granulo_core::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ===========================================================================
// Background
// ===========================================================================

/// Subtract a rolling-ball background.
///
/// Args:
///     img: 2D numpy array (integer or float)
///     d: Rolling-ball diameter in pixels; d <= 0 returns an unchanged copy
///
/// Returns:
///     2D numpy array `img - background`, same shape
#[pyfunction]
#[pyo3(signature = (img, d=80.0))]
fn remove_background<'py>(
    py: Python<'py>,
    img: &Bound<'py, PyAny>,
    d: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let image = any_to_image(img)?;
    let result = py
        .allow_threads(|| compute_remove_background(&image, d))
        .map_err(to_py_err)?;
    Ok(image_to_numpy(py, result))
}

// ===========================================================================
// Granulometry
// ===========================================================================

/// Compute the granulometric size spectrum.
///
/// Args:
///     img: 2D numpy array (integer or float)
///     scale: Resampling factor applied before measuring
///     step: Spacing of probe diameters, in original pixels
///     end: Exclusive upper bound on probe diameters
///     bg_diam: Rolling-ball diameter; 0 disables background removal
///
/// Returns:
///     Tuple `(diameters, spectrum)` of 1D numpy arrays
#[pyfunction]
#[pyo3(signature = (img, scale=0.25, step=5, end=150, bg_diam=50.0))]
fn calc_size_spectrum<'py>(
    py: Python<'py>,
    img: &Bound<'py, PyAny>,
    scale: f64,
    step: usize,
    end: usize,
    bg_diam: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let image = any_to_image(img)?;
    let params = SpectrumParams {
        scale,
        step,
        end,
        background_diameter: bg_diam,
        ..Default::default()
    };
    let result = py
        .allow_threads(|| compute_size_spectrum(&image, &params))
        .map_err(to_py_err)?;
    let (diameters, spectrum) = result.into_parts();
    Ok((diameters.into_pyarray(py), spectrum.into_pyarray(py)))
}

// ===========================================================================
// Morphology
// ===========================================================================

/// Grayscale area opening.
///
/// Args:
///     img: 2D numpy array (integer or float)
///     area: Minimum component size in pixels to keep
///     connectivity: 4 or 8
#[pyfunction]
#[pyo3(signature = (img, area, connectivity=8))]
fn area_opening<'py>(
    py: Python<'py>,
    img: &Bound<'py, PyAny>,
    area: f64,
    connectivity: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let connectivity = Connectivity::from_neighbors(connectivity).ok_or_else(|| {
        PyValueError::new_err(format!("connectivity must be 4 or 8, got {}", connectivity))
    })?;
    let image = any_to_image(img)?;
    let result = py
        .allow_threads(|| compute_area_opening(&image, area, connectivity))
        .map_err(to_py_err)?;
    Ok(image_to_numpy(py, result))
}

// ===========================================================================
// Resampling
// ===========================================================================

/// Bilinear rescale with anti-aliasing when shrinking.
#[pyfunction]
fn rescale<'py>(
    py: Python<'py>,
    img: &Bound<'py, PyAny>,
    scale: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let image = any_to_image(img)?;
    let result = py
        .allow_threads(|| compute_rescale(&image, scale))
        .map_err(to_py_err)?;
    Ok(image_to_numpy(py, result))
}

// ===========================================================================
// Module definition
// ===========================================================================

/// granulo: granulometric size spectra of grayscale images.
///
/// Usage:
///     import numpy as np
///     import granulo
///
///     img = np.random.rand(512, 512) * 255
///     flat = granulo.remove_background(img, d=80.0)
///     diameters, spectrum = granulo.calc_size_spectrum(img, scale=0.25)
#[pymodule]
fn granulo(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(remove_background, m)?)?;
    m.add_function(wrap_pyfunction!(calc_size_spectrum, m)?)?;
    m.add_function(wrap_pyfunction!(area_opening, m)?)?;
    m.add_function(wrap_pyfunction!(rescale, m)?)?;
    Ok(())
}
