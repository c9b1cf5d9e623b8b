use thiserror::Error;

/// Rejections raised by session operations. The display text is shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("No existe un contacto con el número {0}.")]
    UnknownContact(String),

    #[error("Debes esperar a que el contacto acepte tu solicitud.")]
    ContactPending(String),

    #[error("Por favor ingresa el nombre y el número del contacto.")]
    MissingContactFields,

    #[error("El mensaje está vacío.")]
    EmptyMessage,

    #[error("La publicación está vacía.")]
    EmptyPost,

    #[error("La publicación {0} no existe.")]
    UnknownPost(String),

    #[error("La foto {0} no existe.")]
    UnknownPhoto(String),

    #[error("Solo puedes eliminar tus propias fotos.")]
    NotPhotoOwner,
}

/// Registration and login failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Por favor completa todos los campos requeridos.")]
    MissingFields,

    #[error("Este número de celular ya está registrado.")]
    PhoneTaken,

    /// Unknown phone and wrong password are deliberately indistinguishable.
    #[error("Número celular o contraseña incorrectos.")]
    InvalidCredentials,
}
