/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// Each generated method sends `$request::$variant` with the listed fields plus
/// a `respond_to` channel, then waits for the service's answer.
macro_rules! client_method {
    ($(#[$meta:meta])* $client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            $(#[$meta])*
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> $crate::users_actor::ServiceResult<$return_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $crate::users_actor::StoreError::ActorCommunicationError("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| $crate::users_actor::StoreError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}
