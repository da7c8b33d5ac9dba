//! Small convolutional classifier used by the starter project.
//! Input images: `[N, 3, H, W]`, logits: `[N, num_classes]`.

use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;

/// Architecture hyperparameters, persisted next to the checkpoints so the
/// exact model can be rebuilt before loading weights.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    pub num_classes: usize,
    #[config(default = 16)]
    pub stem_channels: usize,
    #[config(default = 32)]
    pub hidden_channels: usize,
}

impl ClassifierConfig {
    /// Initializes the model on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Classifier<B> {
        let stem = Conv2dConfig::new([3, self.stem_channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv = Conv2dConfig::new([self.stem_channels, self.hidden_channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let head = LinearConfig::new(self.hidden_channels, self.num_classes).init(device);

        Classifier { stem, conv, pool, head, activation: Relu::new() }
    }
}

#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    stem: Conv2d<B>,
    conv: Conv2d<B>,
    pool: AdaptiveAvgPool2d,
    head: Linear<B>,
    activation: Relu,
}

impl<B: Backend> Classifier<B> {
    /// Forward pass returning class logits.
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.stem.forward(images));
        let x = self.activation.forward(self.conv.forward(x));
        let x = self.pool.forward(x);
        let x = x.flatten::<2>(1, 3);
        self.head.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    #[test]
    fn test_forward_shape() {
        let device = NdArrayDevice::Cpu;
        let model: Classifier<NdArray> = ClassifierConfig::new(4).init(&device);

        let input = Tensor::<NdArray, 4>::zeros([2, 3, 16, 16], &device);
        let logits = model.forward(input);
        assert_eq!(logits.dims(), [2, 4]);
    }
}
