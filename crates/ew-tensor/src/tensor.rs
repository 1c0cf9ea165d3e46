use crate::dtype::DType;
use crate::element::Element;
use crate::error::{Result, TensorError};
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::storage::CpuStorage;

/// A typed array handle: CPU storage plus a shape.
///
/// Holds contiguous, row-major data. The dtype is always the dtype of the
/// storage. Computation is dispatched to a `ComputeBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: CpuStorage,
    shape: Shape,
    dtype: DType,
}

impl Tensor {
    /// Create a new tensor from native data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new<T: Element>(data: Vec<T>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {:?} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        Tensor {
            storage: T::wrap(data),
            shape,
            dtype: T::DTYPE,
        }
    }

    /// Create a one-dimensional tensor.
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        let n = data.len();
        Tensor::new(data, Shape::new(vec![n]))
    }

    /// Wrap existing storage.
    ///
    /// # Errors
    /// Returns an error if the storage length does not match the shape.
    pub fn from_storage(storage: CpuStorage, shape: Shape) -> Result<Self> {
        if storage.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![storage.len()],
            });
        }
        let dtype = storage.dtype();
        Ok(Tensor {
            storage,
            shape,
            dtype,
        })
    }

    /// A rank-0 tensor holding `value` converted to `dtype`.
    pub fn scalar(value: Scalar, dtype: DType) -> Self {
        Tensor {
            storage: CpuStorage::full(dtype, value, 1),
            shape: Shape::scalar(),
            dtype,
        }
    }

    /// Create a zero-filled tensor with the given shape and dtype.
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        let n = shape.numel();
        Tensor {
            storage: CpuStorage::zeros(dtype, n),
            shape,
            dtype,
        }
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &CpuStorage {
        &self.storage
    }

    /// Borrows the data as a slice of `T`.
    ///
    /// # Errors
    /// Returns an error if `T` does not match the tensor's dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.storage.as_slice::<T>()
    }

    pub fn to_bool_vec(&self) -> Vec<bool> {
        self.storage.to_bool_vec()
    }

    pub fn to_i64_vec(&self) -> Vec<i64> {
        self.storage.to_i64_vec()
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.storage.to_f64_vec()
    }

    /// Returns a copy converted to `dtype`. Same-dtype casts clone.
    pub fn cast(&self, dtype: DType) -> Tensor {
        Tensor {
            storage: self.storage.cast(dtype),
            shape: self.shape.clone(),
            dtype,
        }
    }

    /// Broadcast the tensor to `shape`, materializing repeated elements.
    pub fn broadcast_to(&self, shape: &Shape) -> Result<Tensor> {
        if &self.shape == shape {
            return Ok(self.clone());
        }
        let map = self.shape.broadcast_index_map(shape)?;
        Ok(Tensor {
            storage: self.storage.gather(&map),
            shape: shape.clone(),
            dtype: self.dtype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tensor() {
        let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3]));
        assert_eq!(t.shape().ndim(), 2);
        assert_eq!(t.shape().dim(0), 2);
        assert_eq!(t.shape().dim(1), 3);
        assert_eq!(t.dtype(), DType::F32);
        assert_eq!(t.as_slice::<f32>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_vec_infers_dtype() {
        let t = Tensor::from_vec(vec![1u16, 2]);
        assert_eq!(t.dtype(), DType::U16);
        assert_eq!(t.shape().dims(), &[2]);
    }

    #[test]
    fn test_scalar_tensor() {
        let t = Tensor::scalar(Scalar::Float(2.5), DType::F64);
        assert_eq!(t.shape().ndim(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(t.to_f64_vec(), vec![2.5]);
    }

    #[test]
    fn test_from_storage_mismatch() {
        let s = CpuStorage::I32(vec![1, 2, 3]);
        assert!(Tensor::from_storage(s, Shape::new(vec![2, 2])).is_err());
    }

    #[test]
    fn test_zeros() {
        let z = Tensor::zeros(Shape::new(vec![2, 3]), DType::I8);
        assert_eq!(z.as_slice::<i8>().unwrap(), &[0; 6]);
    }

    #[test]
    fn test_cast() {
        let t = Tensor::from_vec(vec![1.9f64, -1.9]);
        let c = t.cast(DType::I32);
        assert_eq!(c.dtype(), DType::I32);
        assert_eq!(c.as_slice::<i32>().unwrap(), &[1, -1]);
    }

    #[test]
    fn test_broadcast_to() {
        let t = Tensor::from_vec(vec![1i64, 2]);
        let b = t.broadcast_to(&Shape::new(vec![2, 2])).unwrap();
        assert_eq!(b.as_slice::<i64>().unwrap(), &[1, 2, 1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_new_shape_mismatch_panics() {
        let _t = Tensor::new(vec![1.0f32, 2.0], Shape::new(vec![3]));
    }
}
